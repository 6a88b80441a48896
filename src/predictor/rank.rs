use serde::Serialize;
use std::fmt;

/// A codeforces rank tier. `low` is inclusive and `high` exclusive; `None`
/// means unbounded on that side.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub name: &'static str,
    pub abbr: &'static str,
    pub low: Option<i32>,
    pub high: Option<i32>,
    pub color_class: Option<&'static str>,
}

impl Rank {
    const fn new(
        name: &'static str,
        abbr: &'static str,
        low: Option<i32>,
        high: Option<i32>,
        color_class: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            abbr,
            low,
            high,
            color_class,
        }
    }

    pub fn contains(&self, rating: f64) -> bool {
        self.low.map_or(true, |l| rating >= f64::from(l))
            && self.high.map_or(true, |h| rating < f64::from(h))
    }

    /// The tier after this one, `None` for the top tier and for `UNRATED`.
    pub fn next(&self) -> Option<&'static Rank> {
        RATED
            .iter()
            .position(|r| r == self)
            .and_then(|i| RATED.get(i + 1))
    }

    pub fn is_top(&self) -> bool {
        std::ptr::eq(self, top())
    }
}
impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub static UNRATED: Rank = Rank::new("Unrated", "U", None, None, None);
pub static RATED: [Rank; 11] = [
    Rank::new("Newbie", "N", None, Some(1200), Some("user-gray")),
    Rank::new("Pupil", "P", Some(1200), Some(1400), Some("user-green")),
    Rank::new("Specialist", "S", Some(1400), Some(1600), Some("user-cyan")),
    Rank::new("Expert", "E", Some(1600), Some(1900), Some("user-blue")),
    Rank::new("Candidate Master", "CM", Some(1900), Some(2100), Some("user-violet")),
    Rank::new("Master", "M", Some(2100), Some(2300), Some("user-orange")),
    Rank::new("International Master", "IM", Some(2300), Some(2400), Some("user-orange")),
    Rank::new("Grandmaster", "GM", Some(2400), Some(2600), Some("user-red")),
    Rank::new("International Grandmaster", "IGM", Some(2600), Some(3000), Some("user-red")),
    Rank::new("Legendary Grandmaster", "LGM", Some(3000), Some(4000), Some("user-legendary")),
    Rank::new("Tourist", "T", Some(4000), None, Some("user-4000")),
];

pub fn top() -> &'static Rank {
    &RATED[RATED.len() - 1]
}

pub fn for_rating(rating: Option<f64>) -> &'static Rank {
    match rating {
        None => &UNRATED,
        Some(r) => RATED
            .iter()
            .find(|rank| rank.high.map_or(false, |h| r < f64::from(h)))
            .unwrap_or_else(top),
    }
}
