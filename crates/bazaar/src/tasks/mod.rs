pub mod plan_expiry;
