use serde::Deserialize;

pub const TITLE_MAX: usize = 60;
pub const YEAR_MAX: usize = 4;
pub const NAME_MAX: usize = 20;

#[derive(Debug, Default, Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
}

impl MovieForm {
    pub fn is_valid(&self) -> bool {
        within(&self.title, TITLE_MAX) && within(&self.year, YEAR_MAX)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub name: String,
}

impl SettingsForm {
    pub fn is_valid(&self) -> bool {
        within(&self.name, NAME_MAX)
    }
}

/// Non-empty and at most `max` characters long.
fn within(value: &str, max: usize) -> bool {
    !value.is_empty() && value.chars().count() <= max
}

/// Fixture data inserted by `forge`.
pub const DEMO_MOVIES: [(&str, &str); 10] = [
    ("My Neighbor Totoro", "1988"),
    ("Dead Poets Society", "1989"),
    ("A Perfect World", "1993"),
    ("Leon", "1994"),
    ("Mahjong", "1996"),
    ("Swallowtail Butterfly", "1996"),
    ("King of Comedy", "1999"),
    ("Devils on the Doorstep", "1999"),
    ("WALL-E", "2008"),
    ("The Pork of Music", "2012"),
];
