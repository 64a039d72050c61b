pub mod pick;
pub mod player;
pub mod state;
pub mod team;
