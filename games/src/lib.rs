pub mod registry;
pub mod snake;
pub mod testcard;

pub use snake::Snake;
pub use testcard::TestCard;
