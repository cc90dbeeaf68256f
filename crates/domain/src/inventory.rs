use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use santiye_core::{AppError, AppResult, NonEmptyString, UserId};
use serde::{Deserialize, Serialize};

use crate::{MaterialId, ProjectId, StockAdjustmentId, UsageId};

/// Decimal places stored for quantities, prices and balances.
pub const LEDGER_SCALE: u32 = 4;

/// Integer digits stored for quantities, prices and balances.
const LEDGER_INTEGER_DIGITS: u32 = 14;

/// Validates that a ledger quantity is strictly positive and storable.
pub fn positive_quantity(value: Decimal) -> AppResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(AppError::InvalidQuantity(format!(
            "quantity must be greater than zero, got {value}"
        )));
    }

    storable_amount("quantity", value)
}

/// Rejects values the ledger columns cannot hold exactly.
///
/// At most [`LEDGER_SCALE`] significant decimal places and an absolute value
/// below 10^14 are accepted; anything else would be rounded or overflow.
pub fn storable_amount(field: &str, value: Decimal) -> AppResult<Decimal> {
    if value.normalize().scale() > LEDGER_SCALE {
        return Err(AppError::InvalidQuantity(format!(
            "{field} {value} has more than {LEDGER_SCALE} decimal places"
        )));
    }
    if value.abs() >= Decimal::from(10_i64.pow(LEDGER_INTEGER_DIGITS)) {
        return Err(AppError::InvalidQuantity(format!(
            "{field} {value} exceeds the largest storable amount"
        )));
    }

    Ok(value)
}

fn unit_price(value: Decimal) -> AppResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "unit price must not be negative, got {value}"
        )));
    }

    storable_amount("unit price", value)
}

/// Catalog material with its running stock balance.
///
/// `stock_quantity` is a cache of the ledger and is only moved by stock
/// adjustments and project usage records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    id: MaterialId,
    name: NonEmptyString,
    unit: NonEmptyString,
    unit_price: Decimal,
    stock_quantity: Decimal,
    minimum_stock: Decimal,
}

impl Material {
    /// Creates a material snapshot with validated fields.
    pub fn new(
        id: MaterialId,
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_price: Decimal,
        stock_quantity: Decimal,
        minimum_stock: Decimal,
    ) -> AppResult<Self> {
        if unit_price < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "unit price must not be negative, got {unit_price}"
            )));
        }
        if minimum_stock < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "minimum stock must not be negative, got {minimum_stock}"
            )));
        }

        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            unit: NonEmptyString::new(unit)?,
            unit_price,
            stock_quantity,
            minimum_stock,
        })
    }

    /// Returns the material identifier.
    #[must_use]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    /// Returns the catalog name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the unit of measure (e.g. `ton`, `m3`, `adet`).
    #[must_use]
    pub fn unit(&self) -> &NonEmptyString {
        &self.unit
    }

    /// Returns the current catalog unit price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the current balance.
    #[must_use]
    pub fn stock_quantity(&self) -> Decimal {
        self.stock_quantity
    }

    /// Returns the reorder threshold.
    #[must_use]
    pub fn minimum_stock(&self) -> Decimal {
        self.minimum_stock
    }

    /// Returns true when the balance has dropped below the reorder threshold.
    #[must_use]
    pub fn is_below_minimum(&self) -> bool {
        self.stock_quantity < self.minimum_stock
    }
}

/// Input for registering a new catalog material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaterial {
    /// Catalog name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Catalog unit price.
    pub unit_price: Decimal,
    /// Reorder threshold.
    pub minimum_stock: Decimal,
    /// Optional opening balance, recorded as an inbound adjustment.
    pub opening_stock: Option<Decimal>,
}

impl NewMaterial {
    /// Checks that prices and quantities fit the ledger columns.
    pub fn check_storable(&self) -> AppResult<()> {
        unit_price(self.unit_price)?;
        if self.minimum_stock < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "minimum stock must not be negative, got {}",
                self.minimum_stock
            )));
        }
        storable_amount("minimum stock", self.minimum_stock)?;
        if let Some(opening_stock) = self.opening_stock {
            positive_quantity(opening_stock)?;
        }

        Ok(())
    }
}

/// Direction of a stock ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    /// Goods received into stock.
    In,
    /// Goods consumed or shipped out of stock.
    Out,
    /// Goods moved between sites; the company-wide balance is unchanged.
    Transfer,
}

impl AdjustmentKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Transfer => "TRANSFER",
        }
    }

    /// Returns the balance delta this kind applies for a positive quantity.
    #[must_use]
    pub fn signed_delta(&self, quantity: Decimal) -> Decimal {
        match self {
            Self::In => quantity,
            Self::Out => -quantity,
            Self::Transfer => Decimal::ZERO,
        }
    }

    /// Returns true when the quantity must be covered by the current balance.
    #[must_use]
    pub fn requires_available_stock(&self) -> bool {
        matches!(self, Self::Out | Self::Transfer)
    }
}

impl FromStr for AdjustmentKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            "TRANSFER" => Ok(Self::Transfer),
            _ => Err(AppError::Validation(format!(
                "unknown adjustment kind '{value}'"
            ))),
        }
    }
}

/// Immutable stock ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Ledger entry identifier.
    pub id: StockAdjustmentId,
    /// Material whose balance moved.
    pub material_id: MaterialId,
    /// Unsigned magnitude of the movement.
    pub quantity: Decimal,
    /// Movement direction.
    pub kind: AdjustmentKind,
    /// Free-text description.
    pub description: Option<String>,
    /// Acting user.
    pub actor_id: UserId,
    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
}

impl StockAdjustment {
    /// Returns this entry's contribution to the material balance.
    #[must_use]
    pub fn signed_delta(&self) -> Decimal {
        self.kind.signed_delta(self.quantity)
    }
}

/// Validated request to append a stock ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockAdjustment {
    /// Material whose balance moves.
    pub material_id: MaterialId,
    /// Movement direction.
    pub kind: AdjustmentKind,
    /// Strictly positive magnitude.
    pub quantity: Decimal,
    /// Free-text description.
    pub description: Option<String>,
    /// Acting user.
    pub actor_id: UserId,
}

impl NewStockAdjustment {
    /// Builds a request, rejecting non-positive quantities.
    pub fn new(
        material_id: MaterialId,
        kind: AdjustmentKind,
        quantity: Decimal,
        description: Option<String>,
        actor_id: UserId,
    ) -> AppResult<Self> {
        Ok(Self {
            material_id,
            kind,
            quantity: positive_quantity(quantity)?,
            description: description.filter(|value| !value.trim().is_empty()),
            actor_id,
        })
    }

    /// Re-checks the quantity at a storage edge.
    pub fn check_storable(&self) -> AppResult<()> {
        positive_quantity(self.quantity).map(|_| ())
    }
}

/// Material consumed by a project, with the price captured at the time of use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMaterialUsage {
    /// Usage identifier.
    pub id: UsageId,
    /// Consuming project.
    pub project_id: ProjectId,
    /// Consumed material.
    pub material_id: MaterialId,
    /// Consumed quantity, applied as a negative delta on the material.
    pub quantity_used: Decimal,
    /// Unit price snapshot, independent of later catalog price changes.
    pub unit_price_at_time: Decimal,
    /// Day of consumption.
    pub date_used: NaiveDate,
}

impl ProjectMaterialUsage {
    /// Returns the historical cost of this usage.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.quantity_used * self.unit_price_at_time
    }
}

/// Validated request to record project consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectMaterialUsage {
    /// Consuming project.
    pub project_id: ProjectId,
    /// Consumed material.
    pub material_id: MaterialId,
    /// Strictly positive quantity.
    pub quantity_used: Decimal,
    /// Price snapshot; `None` takes the material's current unit price.
    pub unit_price_at_time: Option<Decimal>,
    /// Day of consumption.
    pub date_used: NaiveDate,
}

impl NewProjectMaterialUsage {
    /// Builds a request, rejecting non-positive quantities and negative prices.
    pub fn new(
        project_id: ProjectId,
        material_id: MaterialId,
        quantity_used: Decimal,
        unit_price_at_time: Option<Decimal>,
        date_used: NaiveDate,
    ) -> AppResult<Self> {
        Ok(Self {
            project_id,
            material_id,
            quantity_used: positive_quantity(quantity_used)?,
            unit_price_at_time: unit_price_at_time.map(unit_price).transpose()?,
            date_used,
        })
    }

    /// Re-checks quantity and price at a storage edge.
    pub fn check_storable(&self) -> AppResult<()> {
        positive_quantity(self.quantity_used)?;
        self.unit_price_at_time.map(unit_price).transpose()?;
        Ok(())
    }
}

/// Replacement values for an existing usage record.
///
/// Project and material are fixed once a usage exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageUpdate {
    /// New strictly positive quantity.
    pub quantity_used: Decimal,
    /// New price snapshot; `None` keeps the stored one.
    pub unit_price_at_time: Option<Decimal>,
    /// New consumption day; `None` keeps the stored one.
    pub date_used: Option<NaiveDate>,
}

impl UsageUpdate {
    /// Builds an update, rejecting non-positive quantities and negative prices.
    pub fn new(
        quantity_used: Decimal,
        unit_price_at_time: Option<Decimal>,
        date_used: Option<NaiveDate>,
    ) -> AppResult<Self> {
        Ok(Self {
            quantity_used: positive_quantity(quantity_used)?,
            unit_price_at_time: unit_price_at_time.map(unit_price).transpose()?,
            date_used,
        })
    }

    /// Re-checks quantity and price at a storage edge.
    pub fn check_storable(&self) -> AppResult<()> {
        positive_quantity(self.quantity_used)?;
        self.unit_price_at_time.map(unit_price).transpose()?;
        Ok(())
    }

    /// Returns the balance delta that replacing `previous` with this update applies.
    #[must_use]
    pub fn balance_delta(&self, previous: &ProjectMaterialUsage) -> Decimal {
        previous.quantity_used - self.quantity_used
    }

    /// Returns the usage as it reads after this update.
    #[must_use]
    pub fn apply_to(&self, previous: &ProjectMaterialUsage) -> ProjectMaterialUsage {
        ProjectMaterialUsage {
            quantity_used: self.quantity_used,
            unit_price_at_time: self
                .unit_price_at_time
                .unwrap_or(previous.unit_price_at_time),
            date_used: self.date_used.unwrap_or(previous.date_used),
            ..previous.clone()
        }
    }
}

/// Result of comparing a cached balance against its ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReconciliation {
    /// Reconciled material.
    pub material_id: MaterialId,
    /// Cached `stock_quantity`.
    pub cached_balance: Decimal,
    /// Signed sum of adjustments minus live usage quantities.
    pub ledger_balance: Decimal,
}

impl BalanceReconciliation {
    /// Returns true when the cache agrees with the ledger.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cached_balance == self.ledger_balance
    }
}
