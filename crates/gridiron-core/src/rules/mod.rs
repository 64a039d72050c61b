// League rules consumed by the valuation and recommendation layers.

pub mod draft;
pub mod roster;

pub use draft::{DraftRules, DraftRulesError, RoundPhase, RoundType};
pub use roster::{FlexEligibility, PickValidation, PositionNeeds, RosterRules};
