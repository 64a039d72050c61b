// Library root: draft state reconciliation, the incremental board cache,
// roster rules, player valuation, and pick recommendation.

pub mod cache;
pub mod draft;
pub mod identity;
pub mod recommend;
pub mod rules;
pub mod sources;
pub mod sync;
pub mod valuation;
