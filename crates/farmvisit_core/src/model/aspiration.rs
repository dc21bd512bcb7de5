//! Farmer aspiration selections (step 4).

use super::choice::choice_enum;
use serde::{Deserialize, Serialize};

choice_enum! {
    /// Main constraint the farmer reports.
    MainConstraint {
        WaterShortage => "water_shortage",
        PestAndDisease => "pest_and_disease",
        HighInputCost => "high_input_cost",
        LowSellingPrice => "low_selling_price",
        LaborShortage => "labor_shortage",
        LimitedCapital => "limited_capital",
    }
}

choice_enum! {
    Hope {
        ProductionAid => "production_aid",
        PriceGuarantee => "price_guarantee",
        IrrigationImprovement => "irrigation_improvement",
        MarketAccess => "market_access",
        CreditAccess => "credit_access",
    }
}

choice_enum! {
    TrainingNeed {
        CultivationTechnique => "cultivation_technique",
        PestControl => "pest_control",
        PostHarvest => "post_harvest",
        FarmManagement => "farm_management",
        DigitalMarketing => "digital_marketing",
    }
}

choice_enum! {
    UrgentNeed {
        Seeds => "seeds",
        Fertilizer => "fertilizer",
        Pesticide => "pesticide",
        Machinery => "machinery",
        WaterPump => "water_pump",
    }
}

choice_enum! {
    /// Irrigation water availability at the plot.
    WaterAccess {
        Abundant => "abundant",
        Sufficient => "sufficient",
        Limited => "limited",
        Unavailable => "unavailable",
    }
}

/// Step 4 record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspirationSection {
    pub main_constraint: Option<MainConstraint>,
    pub hope: Option<Hope>,
    pub training_need: Option<TrainingNeed>,
    pub urgent_need: Option<UrgentNeed>,
    pub water_access: Option<WaterAccess>,
    /// Free text, 20..=1000 trimmed characters when present.
    pub suggestion: Option<String>,
}

impl AspirationSection {
    /// Whether all five dropdown selections are made.
    pub fn selections_complete(&self) -> bool {
        self.main_constraint.is_some()
            && self.hope.is_some()
            && self.training_need.is_some()
            && self.urgent_need.is_some()
            && self.water_access.is_some()
    }
}
