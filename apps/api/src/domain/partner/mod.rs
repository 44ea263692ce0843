// Partner domain module
// Sponsors and the prizes they put up

#![allow(clippy::module_inception)]

pub mod partner;
pub mod prize;

pub use partner::{NewPartner, Partner, PartnerTier, PartnerUpdate};
pub use prize::{NewPrize, Prize, PrizeUpdate};
