use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Storage-assigned user identifier
pub type UserId = i64;

/// Stored user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub email: String,
    pub city: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl User {
    /// Build a stored record from submitted fields and an assigned id
    pub fn from_fields(id: UserId, fields: UserFields) -> Self {
        Self {
            id,
            name: fields.name,
            age: fields.age,
            gender: fields.gender,
            email: fields.email,
            city: fields.city,
            interests: fields.interests,
        }
    }

    /// Overwrite every mutable field with the submitted replacement
    pub fn overwrite(&mut self, fields: UserFields) {
        self.name = fields.name;
        self.age = fields.age;
        self.gender = fields.gender;
        self.email = fields.email;
        self.city = fields.city;
        self.interests = fields.interests;
    }
}

/// User fields accepted by create, bulk create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub email: String,
    pub city: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Match filter submitted with a match query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchFilter {
    #[serde(rename = "city", alias = "cities")]
    pub cities: HashSet<String>,
    #[serde(rename = "gender", alias = "genders")]
    pub genders: HashSet<String>,
    #[serde(rename = "age_range_start", alias = "age_start")]
    pub age_start: i32,
    #[serde(rename = "age_range_end", alias = "age_end")]
    pub age_end: i32,
}

impl MatchFilter {
    /// Inclusive on both ends
    #[inline]
    pub fn accepts_age(&self, age: i32) -> bool {
        self.age_start <= age && age <= self.age_end
    }
}
