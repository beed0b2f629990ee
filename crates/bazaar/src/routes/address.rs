// Shipping addresses. Checkout requires exactly one default address per
// user; creation and the default toggle preserve that invariant.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bazaar_core::db::models::Address;
use bazaar_core::error::{ApiError, ErrorCode};

use crate::context::CommerceContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressListResponse {
    pub success: bool,
    pub addresses: Vec<Address>,
}

pub async fn handle_list_addresses(
    ctx: Arc<CommerceContext>,
    user_id: &str,
) -> Result<AddressListResponse, ApiError> {
    let addresses = ctx.store.addresses_for_user(user_id).await?;
    Ok(AddressListResponse {
        success: true,
        addresses,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub success: bool,
    pub address: Address,
}

/// Create an address. The user's first address becomes the default;
/// `is_default: true` steals the flag from any existing default.
pub async fn handle_create_address(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    body: CreateAddressRequest,
) -> Result<AddressResponse, ApiError> {
    if body.name.is_empty() || body.street.is_empty() || body.city.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::MissingRequiredFields));
    }

    let existing = ctx.store.addresses_for_user(user_id).await?;
    let make_default = body.is_default || existing.is_empty();

    let address = Address {
        id: uuid::Uuid::new_v4().to_string(),
        user: user_id.to_string(),
        name: body.name,
        phone: body.phone,
        street: body.street,
        city: body.city,
        state: body.state,
        pincode: body.pincode,
        is_default: make_default,
    };

    let created = ctx.store.create_address(&address).await?;
    if make_default && !existing.is_empty() {
        // Re-point the default at the new address.
        ctx.store.set_default_address(user_id, &created.id).await?;
    }

    Ok(AddressResponse {
        success: true,
        address: created,
    })
}

/// Make an existing address the user's single default.
pub async fn handle_set_default_address(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    address_id: &str,
) -> Result<AddressResponse, ApiError> {
    let updated = ctx
        .store
        .set_default_address(user_id, address_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::AddressNotFound))?;

    Ok(AddressResponse {
        success: true,
        address: updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::options::CommerceOptions;
    use bazaar_memory::MemoryAdapter;

    fn ctx() -> Arc<CommerceContext> {
        CommerceContext::new(
            CommerceOptions::new("test-secret"),
            Arc::new(MemoryAdapter::new()),
        )
    }

    fn request(name: &str, is_default: bool) -> CreateAddressRequest {
        CreateAddressRequest {
            name: name.into(),
            phone: "9876543210".into(),
            street: "14 MG Road".into(),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            pincode: "560001".into(),
            is_default,
        }
    }

    #[tokio::test]
    async fn first_address_becomes_default() {
        let ctx = ctx();
        let res = handle_create_address(ctx.clone(), "u1", request("Home", false))
            .await
            .unwrap();
        assert!(res.address.is_default);

        let default = ctx.store.find_default_address("u1").await.unwrap().unwrap();
        assert_eq!(default.id, res.address.id);
    }

    #[tokio::test]
    async fn new_default_steals_the_flag() {
        let ctx = ctx();
        let first = handle_create_address(ctx.clone(), "u1", request("Home", false))
            .await
            .unwrap();
        let second = handle_create_address(ctx.clone(), "u1", request("Office", true))
            .await
            .unwrap();

        let addresses = ctx.store.addresses_for_user("u1").await.unwrap();
        assert_eq!(addresses.len(), 2);
        let defaults: Vec<_> = addresses.iter().filter(|a| a.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, second.address.id);
        assert_ne!(defaults[0].id, first.address.id);
    }

    #[tokio::test]
    async fn set_default_switches_between_addresses() {
        let ctx = ctx();
        let first = handle_create_address(ctx.clone(), "u1", request("Home", false))
            .await
            .unwrap();
        let second = handle_create_address(ctx.clone(), "u1", request("Office", false))
            .await
            .unwrap();
        assert!(!second.address.is_default);

        handle_set_default_address(ctx.clone(), "u1", &second.address.id)
            .await
            .unwrap();
        let default = ctx.store.find_default_address("u1").await.unwrap().unwrap();
        assert_eq!(default.id, second.address.id);

        handle_set_default_address(ctx.clone(), "u1", &first.address.id)
            .await
            .unwrap();
        let default = ctx.store.find_default_address("u1").await.unwrap().unwrap();
        assert_eq!(default.id, first.address.id);
    }

    #[tokio::test]
    async fn set_default_unknown_address_is_not_found() {
        let ctx = ctx();
        let err = handle_set_default_address(ctx, "u1", "ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AddressNotFound);
    }
}
