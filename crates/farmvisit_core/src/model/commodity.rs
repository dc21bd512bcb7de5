//! Commodity detail model (step 3).
//!
//! # Responsibility
//! - Define the three commodity branches as one sum type.
//! - Provide one kind-erased view consumed by validation, gating and payload
//!   assembly.
//!
//! # Invariants
//! - A session holds at most one branch; the branch tag is the commodity kind.
//! - Wire keys of a branch are always prefixed with the kind wire value.

use super::choice::{choice_enum, Choice};
use super::FieldError;
use serde::{Deserialize, Serialize};

choice_enum! {
    /// Discriminator selecting which detail schema applies.
    CommodityKind {
        /// Tanaman pangan (rice, corn, soybean, ...).
        Food => "food",
        /// Vegetables and fruit.
        Horticulture => "horticulture",
        /// Estate crops (coffee, cocoa, oil palm, ...).
        Plantation => "plantation",
    }
}

impl CommodityKind {
    /// Display name used in the form.
    pub fn title(self) -> &'static str {
        match self {
            Self::Food => "Pangan",
            Self::Horticulture => "Hortikultura",
            Self::Plantation => "Perkebunan",
        }
    }
}

choice_enum! {
    /// Tenure of the surveyed plot.
    LandStatus {
        Owned => "owned",
        Rented => "rented",
        Sharecropped => "sharecropped",
        Communal => "communal",
    }
}

choice_enum! {
    FoodGrowthPhase {
        LandPreparation => "land_preparation",
        Vegetative => "vegetative",
        Generative => "generative",
        Ripening => "ripening",
    }
}

choice_enum! {
    /// Cultivation technology for food crops.
    FoodMethod {
        JajarLegowo => "jajar_legowo",
        DirectSeeding => "direct_seeding",
        Conventional => "conventional",
        Sri => "sri",
    }
}

choice_enum! {
    HorticultureGrowthPhase {
        Seedling => "seedling",
        Vegetative => "vegetative",
        Flowering => "flowering",
        Fruiting => "fruiting",
        Harvesting => "harvesting",
    }
}

choice_enum! {
    HorticultureMethod {
        OpenField => "open_field",
        Greenhouse => "greenhouse",
        Hydroponic => "hydroponic",
        Polybag => "polybag",
    }
}

choice_enum! {
    PlantationGrowthPhase {
        Immature => "immature",
        Mature => "mature",
        Productive => "productive",
        Aging => "aging",
    }
}

choice_enum! {
    /// Farming system for estate crops.
    PlantationMethod {
        Monoculture => "monoculture",
        Intercropping => "intercropping",
        Agroforestry => "agroforestry",
    }
}

/// Field slots shared by every commodity branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Commodity,
    LandStatus,
    LandArea,
    GrowthPhase,
    PlantAge,
    Method,
    PlantingDate,
    HarvestDate,
    DelayReason,
    /// Post-harvest issue (food, plantation) or production problem
    /// (horticulture).
    Problem,
}

impl DetailField {
    pub const ALL: [DetailField; 10] = [
        DetailField::Commodity,
        DetailField::LandStatus,
        DetailField::LandArea,
        DetailField::GrowthPhase,
        DetailField::PlantAge,
        DetailField::Method,
        DetailField::PlantingDate,
        DetailField::HarvestDate,
        DetailField::DelayReason,
        DetailField::Problem,
    ];

    fn suffix(self, kind: CommodityKind) -> &'static str {
        match self {
            Self::Commodity => "commodity",
            Self::LandStatus => "land_status",
            Self::LandArea => "land_area",
            Self::GrowthPhase => "growth_phase",
            Self::PlantAge => "plant_age",
            Self::Method => "method",
            Self::PlantingDate => "planting_date",
            Self::HarvestDate => "harvest_date",
            Self::DelayReason => "delay_reason",
            Self::Problem => match kind {
                CommodityKind::Horticulture => "production_problem",
                CommodityKind::Food | CommodityKind::Plantation => "post_harvest",
            },
        }
    }

    /// Wire key (and validation path) of this slot for one branch.
    pub fn key(self, kind: CommodityKind) -> String {
        format!("{}_{}", kind.as_str(), self.suffix(kind))
    }

    /// Human-readable label for messages.
    pub fn label(self, kind: CommodityKind) -> &'static str {
        match (self, kind) {
            (Self::Commodity, _) => "Commodity name",
            (Self::LandStatus, _) => "Land status",
            (Self::LandArea, _) => "Land area",
            (Self::GrowthPhase, _) => "Growth phase",
            (Self::PlantAge, _) => "Plant age",
            (Self::Method, CommodityKind::Food) => "Cultivation technology",
            (Self::Method, CommodityKind::Horticulture) => "Cultivation method",
            (Self::Method, CommodityKind::Plantation) => "Farming system",
            (Self::PlantingDate, _) => "Planting date",
            (Self::HarvestDate, _) => "Harvest date",
            (Self::DelayReason, _) => "Delay reason",
            (Self::Problem, CommodityKind::Horticulture) => "Production problem",
            (Self::Problem, _) => "Post-harvest issue",
        }
    }

    /// Resolves a branch key back to its slot.
    pub fn from_key(kind: CommodityKind, key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key(kind) == key)
    }
}

/// Crop detail record for one commodity branch.
///
/// `P` is the branch growth-phase set, `M` its cultivation method set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropDetail<P, M> {
    pub commodity: String,
    pub land_status: Option<LandStatus>,
    /// Hectares.
    pub land_area: Option<f64>,
    pub growth_phase: Option<P>,
    /// Days for food and horticulture, years for plantation crops.
    pub plant_age: Option<f64>,
    pub method: Option<M>,
    pub planting_date: String,
    pub harvest_date: String,
    pub delay_reason: String,
    pub problem: String,
}

impl<P, M> Default for CropDetail<P, M> {
    fn default() -> Self {
        Self {
            commodity: String::new(),
            land_status: None,
            land_area: None,
            growth_phase: None,
            plant_age: None,
            method: None,
            planting_date: String::new(),
            harvest_date: String::new(),
            delay_reason: String::new(),
            problem: String::new(),
        }
    }
}

pub type FoodDetail = CropDetail<FoodGrowthPhase, FoodMethod>;
pub type HorticultureDetail = CropDetail<HorticultureGrowthPhase, HorticultureMethod>;
pub type PlantationDetail = CropDetail<PlantationGrowthPhase, PlantationMethod>;

impl<P: Choice, M: Choice> CropDetail<P, M> {
    fn view(&self, kind: CommodityKind) -> DetailView<'_> {
        DetailView {
            kind,
            commodity: self.commodity.as_str(),
            land_status: self.land_status,
            land_area: self.land_area,
            growth_phase: self.growth_phase.map(Choice::as_str),
            plant_age: self.plant_age,
            method: self.method.map(Choice::as_str),
            planting_date: self.planting_date.as_str(),
            harvest_date: self.harvest_date.as_str(),
            delay_reason: self.delay_reason.as_str(),
            problem: self.problem.as_str(),
        }
    }

    fn set(&mut self, field: DetailField, key: &str, value: &str) -> Result<(), FieldError> {
        match field {
            DetailField::Commodity => self.commodity = value.to_string(),
            DetailField::LandStatus => self.land_status = super::parse_choice(key, value)?,
            DetailField::LandArea => self.land_area = super::parse_number(key, value)?,
            DetailField::GrowthPhase => self.growth_phase = super::parse_choice(key, value)?,
            DetailField::PlantAge => self.plant_age = super::parse_number(key, value)?,
            DetailField::Method => self.method = super::parse_choice(key, value)?,
            DetailField::PlantingDate => self.planting_date = value.to_string(),
            DetailField::HarvestDate => self.harvest_date = value.to_string(),
            DetailField::DelayReason => self.delay_reason = value.to_string(),
            DetailField::Problem => self.problem = value.to_string(),
        }
        Ok(())
    }
}

/// Commodity detail tagged by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommodityDetail {
    Food(FoodDetail),
    Horticulture(HorticultureDetail),
    Plantation(PlantationDetail),
}

impl CommodityDetail {
    /// Creates an empty branch for `kind`.
    pub fn empty(kind: CommodityKind) -> Self {
        match kind {
            CommodityKind::Food => Self::Food(FoodDetail::default()),
            CommodityKind::Horticulture => Self::Horticulture(HorticultureDetail::default()),
            CommodityKind::Plantation => Self::Plantation(PlantationDetail::default()),
        }
    }

    pub fn kind(&self) -> CommodityKind {
        match self {
            Self::Food(_) => CommodityKind::Food,
            Self::Horticulture(_) => CommodityKind::Horticulture,
            Self::Plantation(_) => CommodityKind::Plantation,
        }
    }

    /// Kind-erased read view of the active branch.
    pub fn view(&self) -> DetailView<'_> {
        match self {
            Self::Food(detail) => detail.view(CommodityKind::Food),
            Self::Horticulture(detail) => detail.view(CommodityKind::Horticulture),
            Self::Plantation(detail) => detail.view(CommodityKind::Plantation),
        }
    }

    pub(crate) fn set(
        &mut self,
        field: DetailField,
        key: &str,
        value: &str,
    ) -> Result<(), FieldError> {
        match self {
            Self::Food(detail) => detail.set(field, key, value),
            Self::Horticulture(detail) => detail.set(field, key, value),
            Self::Plantation(detail) => detail.set(field, key, value),
        }
    }
}

/// Borrowed, kind-erased projection of one commodity branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailView<'a> {
    pub kind: CommodityKind,
    pub commodity: &'a str,
    pub land_status: Option<LandStatus>,
    pub land_area: Option<f64>,
    pub growth_phase: Option<&'static str>,
    pub plant_age: Option<f64>,
    pub method: Option<&'static str>,
    pub planting_date: &'a str,
    pub harvest_date: &'a str,
    pub delay_reason: &'a str,
    pub problem: &'a str,
}

impl DetailView<'_> {
    /// Wire key of `field` within this branch.
    pub fn key(&self, field: DetailField) -> String {
        field.key(self.kind)
    }
}
