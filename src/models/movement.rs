use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

/// Direction of a stock movement.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    pub fn label(&self) -> &'static str {
        match self {
            MovementType::In => "Stock In",
            MovementType::Out => "Stock Out",
        }
    }
}

/// Reasons offered when recording a movement. The stored reason is free text;
/// these are the conventional values.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum MovementReason {
    Purchase,
    Return,
    Adjustment,
    #[serde(rename = "Transfer In")]
    #[strum(serialize = "Transfer In")]
    TransferIn,
    Sale,
    Damage,
    Loss,
    #[serde(rename = "Transfer Out")]
    #[strum(serialize = "Transfer Out")]
    TransferOut,
}

impl MovementReason {
    pub fn options_for(movement_type: MovementType) -> &'static [MovementReason] {
        use MovementReason::*;
        match movement_type {
            MovementType::In => &[Purchase, Return, Adjustment, TransferIn],
            MovementType::Out => &[Sale, Damage, Loss, TransferOut, Adjustment],
        }
    }

    pub fn applies_to(&self, movement_type: MovementType) -> bool {
        Self::options_for(movement_type).contains(self)
    }
}

/// A recorded ledger entry. Never edited or removed once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: u32,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: String,
    pub date: DateTime<Utc>,
    pub user_id: String,
}

impl Movement {
    /// Calendar day of the movement, truncating the UTC timestamp.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Quantity with the sign of its direction.
    pub fn signed_quantity(&self) -> i64 {
        match self.movement_type {
            MovementType::In => i64::from(self.quantity),
            MovementType::Out => -i64::from(self.quantity),
        }
    }
}

/// Movement as submitted by a caller; id, timestamp and user are stamped on record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    #[validate(length(min = 1))]
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: String,
}

impl NewMovement {
    pub fn new(product_id: impl Into<String>, movement_type: MovementType, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            movement_type,
            quantity,
            reason: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn into_movement(self, id: String, date: DateTime<Utc>, user_id: String) -> Movement {
        Movement {
            id,
            product_id: self.product_id,
            movement_type: self.movement_type,
            quantity: self.quantity,
            reason: self.reason,
            notes: self.notes,
            date,
            user_id,
        }
    }
}
