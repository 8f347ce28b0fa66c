// Movement & withdrawal consistency engine
pub mod administrations;
pub mod inventory;
pub mod movements;
pub mod withdrawal;
