//! Survey steps and their client-side routes.

use serde::{Deserialize, Serialize};

/// One page of the multi-page survey form, gated in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Officer, farmer and location.
    Identity,
    /// Commodity kind selection.
    Commodity,
    /// Kind-specific crop detail, pests, weather and photo.
    CommodityDetail,
    /// Farmer aspirations.
    Aspiration,
    /// Read-only summary before submission.
    Review,
}

impl StepId {
    /// Every step in navigation order.
    pub const ALL: [StepId; 5] = [
        StepId::Identity,
        StepId::Commodity,
        StepId::CommodityDetail,
        StepId::Aspiration,
        StepId::Review,
    ];

    /// One-based step index as shown to the user.
    pub fn index(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Commodity => 2,
            Self::CommodityDetail => 3,
            Self::Aspiration => 4,
            Self::Review => 5,
        }
    }

    /// Resolves a one-based step index.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.index() == index)
    }

    /// Step title shown in the stepper and in gate notices.
    pub fn title(self) -> &'static str {
        match self {
            Self::Identity => "Identitas",
            Self::Commodity => "Komoditas",
            Self::CommodityDetail => "Detail Komoditas",
            Self::Aspiration => "Aspirasi",
            Self::Review => "Ringkasan",
        }
    }

    /// Client-side route path for this step.
    pub fn route(self) -> &'static str {
        match self {
            Self::Identity => "/survey/identitas",
            Self::Commodity => "/survey/komoditas",
            Self::CommodityDetail => "/survey/detail-komoditas",
            Self::Aspiration => "/survey/aspirasi",
            Self::Review => "/survey/ringkasan",
        }
    }

    /// Resolves a route path. A trailing slash is tolerated.
    pub fn from_route(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Self::ALL.into_iter().find(|step| step.route() == normalized)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::StepId;

    #[test]
    fn index_round_trips_for_every_step() {
        for step in StepId::ALL {
            assert_eq!(StepId::from_index(step.index()), Some(step));
        }
        assert_eq!(StepId::from_index(0), None);
        assert_eq!(StepId::from_index(6), None);
    }

    #[test]
    fn routes_resolve_with_trailing_slash() {
        assert_eq!(
            StepId::from_route("/survey/komoditas/"),
            Some(StepId::Commodity)
        );
        assert_eq!(StepId::from_route("/survey/unknown"), None);
    }

    #[test]
    fn first_and_last_steps_have_no_neighbour_outside_the_flow() {
        assert_eq!(StepId::Identity.previous(), None);
        assert_eq!(StepId::Review.next(), None);
        assert_eq!(StepId::Commodity.next(), Some(StepId::CommodityDetail));
    }
}
