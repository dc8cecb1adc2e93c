pub mod card;
pub mod channel;
pub mod item;
pub mod timeline;

pub use card::Card;
pub use channel::{ChannelSetting, ChannelSettings, ChannelType};
pub use item::{Content, Item};
pub use timeline::{Paging, Timeline};
