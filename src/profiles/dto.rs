use serde::{Deserialize, Serialize};

use super::repo_types::Profile;
use crate::{api::ErrDetail, users::dto::PublicUser};

const NAME_MAX: usize = 125;
const PHONE_MAX: usize = 20;

#[derive(Debug, Deserialize)]
pub struct MakeProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

impl MakeProfileRequest {
    pub fn validate(&self) -> Vec<ErrDetail> {
        let mut details = Vec::new();
        for (field, value, max) in [
            ("first_name", &self.first_name, NAME_MAX),
            ("last_name", &self.last_name, NAME_MAX),
            ("phone", &self.phone, PHONE_MAX),
        ] {
            if value.chars().count() > max {
                details.push(ErrDetail::field(
                    field,
                    format!("must be at most {max} characters long"),
                ));
            }
        }
        details
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: PublicUser,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub picture: String,
}

impl From<&Profile> for ProfileView {
    fn from(p: &Profile) -> Self {
        Self {
            user: PublicUser::from(&p.user),
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            phone: p.phone.clone(),
            picture: p.picture.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub profile: ProfileView,
}
