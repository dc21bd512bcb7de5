#![allow(dead_code)]

use chrono::NaiveDate;
use farmvisit_core::{Attachment, CommodityKind, FormSession, ValidationContext};

pub fn ctx() -> ValidationContext {
    ValidationContext::new(NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date"))
}

pub fn photo() -> Attachment {
    Attachment::new("sawah.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3])
}

pub fn set_all(session: &mut FormSession, pairs: &[(&str, &str)]) {
    for (key, value) in pairs {
        session
            .set_field(key, value)
            .unwrap_or_else(|err| panic!("set {key}: {err}"));
    }
}

pub fn identity_only() -> FormSession {
    let mut session = FormSession::new();
    set_all(
        &mut session,
        &[
            ("officer_name", "Sari Wulandari"),
            ("visit_date", "2026-03-09"),
            ("farmer_name", "Pak Darmo"),
            ("farmer_group", "Tani Makmur"),
            ("village", "Karangsari"),
            ("district", "Banyumas"),
            ("latitude", "-7.4034"),
            ("longitude", "109.2345"),
        ],
    );
    session
}

fn branch_pairs(kind: CommodityKind) -> Vec<(String, String)> {
    let (commodity, phase, method, problem_key, problem) = match kind {
        CommodityKind::Food => (
            "padi",
            "generative",
            "jajar_legowo",
            "food_post_harvest",
            "gabah basah, dryer terbatas",
        ),
        CommodityKind::Horticulture => (
            "cabai merah",
            "fruiting",
            "polybag",
            "horticulture_production_problem",
            "buah rontok",
        ),
        CommodityKind::Plantation => (
            "kopi robusta",
            "productive",
            "agroforestry",
            "plantation_post_harvest",
            "penjemuran tidak merata",
        ),
    };
    let prefix = match kind {
        CommodityKind::Food => "food",
        CommodityKind::Horticulture => "horticulture",
        CommodityKind::Plantation => "plantation",
    };
    vec![
        (format!("{prefix}_commodity"), commodity.to_string()),
        (format!("{prefix}_land_status"), "owned".to_string()),
        (format!("{prefix}_land_area"), "0.75".to_string()),
        (format!("{prefix}_growth_phase"), phase.to_string()),
        (format!("{prefix}_plant_age"), "45".to_string()),
        (format!("{prefix}_method"), method.to_string()),
        (format!("{prefix}_planting_date"), "2026-01-20".to_string()),
        (format!("{prefix}_harvest_date"), "2026-04-25".to_string()),
        (format!("{prefix}_delay_reason"), "hujan terlambat".to_string()),
        (problem_key.to_string(), problem.to_string()),
    ]
}

/// Session passing every step for `kind`.
pub fn valid_session(kind: CommodityKind) -> FormSession {
    let mut session = identity_only();
    session.select_commodity(kind);
    for (key, value) in branch_pairs(kind) {
        session
            .set_field(&key, &value)
            .unwrap_or_else(|err| panic!("set {key}: {err}"));
    }
    set_all(
        &mut session,
        &[
            ("has_pest", "false"),
            ("weather_condition", "hujan ringan"),
            ("weather_impact", "tidak berdampak"),
            ("main_constraint", "high_input_cost"),
            ("hope", "price_guarantee"),
            ("training_need", "pest_control"),
            ("urgent_need", "fertilizer"),
            ("water_access", "sufficient"),
        ],
    );
    session.set_attachment(photo());
    session
}

/// Wire keys required by `kind`'s branch.
pub fn branch_keys(kind: CommodityKind) -> Vec<String> {
    branch_pairs(kind).into_iter().map(|(key, _)| key).collect()
}
