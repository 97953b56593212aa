//! Canned catalog records shared across integration tests.
//!
//! Records come back from the mock sources without request scope; the
//! sources stamp scope from the query, the way a real transport echoes it.

use rift_client::staticdata::{ChampionData, ItemData};
use rift_client::summoner::SummonerData;

pub fn roster() -> Vec<ChampionData> {
    vec![
        champion(1, "Annie", "Annie", "the Dark Child"),
        champion(266, "Aatrox", "Aatrox", "the Darkin Blade"),
        champion(429, "Kalista", "Kalista", "the Spear of Vengeance"),
    ]
}

pub fn champion(id: i64, name: &str, key: &str, title: &str) -> ChampionData {
    ChampionData {
        id,
        name: Some(name.to_owned()),
        key: Some(key.to_owned()),
        title: Some(title.to_owned()),
        ally_tips: Some(vec![format!("Play around {name}'s cooldowns.")]),
        enemy_tips: Some(vec![format!("Watch out for {name}.")]),
        ..ChampionData::default()
    }
}

pub fn shop() -> Vec<ItemData> {
    vec![
        item(1001, "Boots of Speed", 300, 300, &[], &[3006, 3047]),
        item(3006, "Berserker's Greaves", 500, 1100, &[1001], &[]),
        item(3044, "Phage", 565, 1250, &[], &[3078]),
        item(3057, "Sheen", 700, 1050, &[], &[3078]),
        item(3077, "Tiamat", 325, 1325, &[], &[3078]),
        item(3078, "Trinity Force", 3, 3733, &[3044, 3057, 3077], &[]),
        ItemData {
            required_champion_key: Some("Kalista".to_owned()),
            ..item(3599, "Black Spear", 100, 100, &[], &[])
        },
    ]
}

pub fn item(
    id: i64,
    name: &str,
    base_price: i64,
    total_price: i64,
    builds_from: &[i64],
    builds_into: &[i64],
) -> ItemData {
    ItemData {
        id,
        name: Some(name.to_owned()),
        description: Some(format!("<mainText>{name}</mainText>")),
        plaintext: Some(format!("{name} does what it says.")),
        base_price,
        total_price,
        tags: Some(vec!["Starter".to_owned()]),
        builds_from: (!builds_from.is_empty()).then(|| builds_from.to_vec()),
        builds_into: (!builds_into.is_empty()).then(|| builds_into.to_vec()),
        ..ItemData::default()
    }
}

pub fn accounts() -> Vec<SummonerData> {
    vec![
        SummonerData {
            id: 22_508_641,
            account_id: 36_321_079,
            name: Some("FatalElement".to_owned()),
            level: 30,
            profile_icon_id: 983,
            revision_date: 1_518_068_731_000,
            ..SummonerData::default()
        },
        SummonerData {
            id: 31_287_954,
            account_id: 44_959_378,
            name: Some("Kalturi".to_owned()),
            level: 27,
            profile_icon_id: 16,
            revision_date: 1_517_471_833_000,
            ..SummonerData::default()
        },
    ]
}
