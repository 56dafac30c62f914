//! Product edit rules
//!
//! - 非管理员只能修改 `delivered` 与 `use`，`begInventory` / `waste` /
//!   `withdrawal` 保持存储值
//! - 负数量和负价格拒绝 (400)；提交结转的负 `begInventory` 保持不变时允许
//! - 库存不足 (`use` 超过可用量) 仅记录告警，不拒绝

use shared::models::{Product, ProductCreate, ProductQuantities, ProductUpdate, Role};

use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Validated field set ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantities: ProductQuantities,
}

/// Validate a create payload. Any client-supplied `current` has already been
/// dropped by deserialization.
pub fn prepare_create(payload: ProductCreate) -> AppResult<ProductFields> {
    let fields = ProductFields {
        name: payload.name.trim().to_string(),
        category: payload.category.trim().to_string(),
        price: payload.price,
        quantities: payload.quantities,
    };
    validate(&fields, None)?;
    Ok(fields)
}

/// Merge an update payload onto the stored product, applying role gating.
pub fn prepare_update(
    existing: &Product,
    payload: ProductUpdate,
    role: &Role,
) -> AppResult<ProductFields> {
    let quantities = gate_quantities(&existing.quantities, payload.quantities, role);

    let fields = ProductFields {
        name: payload
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| existing.name.clone()),
        category: payload
            .category
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| existing.category.clone()),
        price: payload.price.unwrap_or(existing.price),
        quantities,
    };
    validate(&fields, Some(&existing.quantities))?;
    Ok(fields)
}

/// Non-admins keep the stored baseline fields; `delivered` and `use` always
/// come from the request.
pub fn gate_quantities(
    stored: &ProductQuantities,
    requested: ProductQuantities,
    role: &Role,
) -> ProductQuantities {
    if role.can_edit_baseline() {
        return requested;
    }

    ProductQuantities {
        beg_inventory: stored.beg_inventory,
        waste: stored.waste,
        withdrawal: stored.withdrawal,
        delivered: requested.delivered,
        use_qty: requested.use_qty,
    }
}

/// `stored` is the product being updated; its values pass the quantity
/// check unchanged.
fn validate(fields: &ProductFields, stored: Option<&ProductQuantities>) -> AppResult<()> {
    if fields.name.is_empty() {
        return Err(AppError::new(ErrorCode::ProductNameRequired).with_detail("field", "name"));
    }
    validate_required_text(&fields.name, "name", MAX_NAME_LEN)?;
    if fields.category.len() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "category is too long (max {MAX_NAME_LEN})"
        ))
        .with_detail("field", "category"));
    }

    if fields.price < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("price must be non-negative, got {}", fields.price),
        )
        .with_detail("field", "price"));
    }

    let negative = match stored {
        Some(stored) => fields.quantities.first_negative_change(stored),
        None => fields.quantities.first_negative(),
    };
    if let Some(field) = negative {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidQuantity,
            format!("{field} must be non-negative"),
        )
        .with_detail("field", field));
    }

    Ok(())
}

/// Log when `use` exceeds the stock on hand. Never rejects.
pub fn warn_if_overdrawn(branch: &str, name: &str, q: &ProductQuantities) {
    if q.overdraws() {
        tracing::warn!(
            branch = %branch,
            product = %name,
            used = q.use_qty,
            available = q.available_for_use(),
            "Usage exceeds available stock"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Product {
        Product {
            id: 1,
            branch: "north".into(),
            name: "Rice".into(),
            category: "Dry Goods".into(),
            price: 40.0,
            quantities: ProductQuantities {
                beg_inventory: 10.0,
                delivered: 5.0,
                waste: 2.0,
                use_qty: 1.0,
                withdrawal: 0.0,
            },
            current: 12.0,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn request() -> ProductUpdate {
        ProductUpdate {
            quantities: ProductQuantities {
                beg_inventory: 100.0,
                delivered: 7.0,
                waste: 50.0,
                use_qty: 3.0,
                withdrawal: 9.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_staff_cannot_move_baseline() {
        let role: Role = "Staff-North".parse().unwrap();
        let fields = prepare_update(&stored(), request(), &role).unwrap();

        assert_eq!(fields.quantities.beg_inventory, 10.0);
        assert_eq!(fields.quantities.waste, 2.0);
        assert_eq!(fields.quantities.withdrawal, 0.0);
        assert_eq!(fields.quantities.delivered, 7.0);
        assert_eq!(fields.quantities.use_qty, 3.0);
        assert_eq!(fields.name, "Rice");
        assert_eq!(fields.price, 40.0);
    }

    #[test]
    fn test_user_and_manager_are_gated_too() {
        for role in ["User", "Manager-North"] {
            let role: Role = role.parse().unwrap();
            let fields = prepare_update(&stored(), request(), &role).unwrap();
            assert_eq!(fields.quantities.beg_inventory, 10.0);
        }
    }

    #[test]
    fn test_admin_edits_everything() {
        let fields = prepare_update(&stored(), request(), &Role::admin()).unwrap();
        assert_eq!(fields.quantities, request().quantities);
        assert_eq!(fields.quantities.current(), 45.0);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut payload = request();
        payload.quantities.delivered = -1.0;
        let err = prepare_update(&stored(), payload, &Role::admin()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidQuantity);
    }

    #[test]
    fn test_gated_negative_field_is_ignored() {
        // waste is forced back to the stored value before validation
        let mut payload = request();
        payload.quantities.waste = -5.0;
        let role: Role = "Staff-North".parse().unwrap();
        assert!(prepare_update(&stored(), payload, &role).is_ok());
    }

    #[test]
    fn test_carried_negative_baseline_stays_editable() {
        let mut product = stored();
        product.quantities = ProductQuantities {
            beg_inventory: -1.0,
            ..Default::default()
        };
        let payload = ProductUpdate {
            quantities: ProductQuantities {
                delivered: 10.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let staff: Role = "Staff-North".parse().unwrap();
        let fields = prepare_update(&product, payload.clone(), &staff).unwrap();
        assert_eq!(fields.quantities.current(), 9.0);

        // Admin resending the stored baseline is fine, a new negative is not
        let mut keep = payload.clone();
        keep.quantities.beg_inventory = -1.0;
        assert!(prepare_update(&product, keep, &Role::admin()).is_ok());

        let mut lower = payload;
        lower.quantities.beg_inventory = -2.0;
        let err = prepare_update(&product, lower, &Role::admin()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidQuantity);
    }

    #[test]
    fn test_create_requires_name() {
        let err = prepare_create(ProductCreate {
            name: "   ".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNameRequired);
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let err = prepare_create(ProductCreate {
            name: "Rice".into(),
            price: -1.0,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);
    }
}
