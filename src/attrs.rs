//! Attribute and load-group names shared across the catalog entities.
//!
//! Identity derivation hashes attribute *names* alongside their values, so
//! these constants are part of every cache identity; changing one invalidates
//! every key derived with it.

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const KEY: &str = "key";
pub const ACCOUNT_ID: &str = "account_id";

pub const PLATFORM: &str = "platform";
pub const VERSION: &str = "version";
pub const LOCALE: &str = "locale";
pub const INCLUDED_DATA: &str = "included_data";
pub const DATA_BY_ID: &str = "data_by_id";

/// Load-group names. Each group is fetched at most once per proxy instance.
pub mod groups {
    /// A champion's static data fields.
    pub const CHAMPION: &str = "champion";
    /// A champion's free-rotation status.
    pub const ROTATION: &str = "rotation";
    /// An item's full static data.
    pub const ITEM: &str = "item";
    /// A summoner's account fields.
    pub const SUMMONER: &str = "summoner";
    /// The single group of a full-catalog list.
    pub const LIST: &str = "list";
}
