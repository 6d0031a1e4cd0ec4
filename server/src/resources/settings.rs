//! Site-wide settings record (a singleton)

use super::reconcile;
use crate::config::UNSET_SOCIAL_LINK;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub institution_name: String,
    pub tagline: String,
    pub hero_verse: String,
    pub email: String,
    pub phone: String,
    pub phone_secondary: String,
    pub address: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub youtube: String,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Legacy nested social links (`{"socials": {"facebook": ...}}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
}

/// Settings form payload, after field-name reconciliation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "SettingsForm")]
pub struct SettingsInput {
    pub institution_name: Option<String>,
    pub tagline: Option<String>,
    pub hero_verse: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_secondary: Option<String>,
    pub address: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    pub socials: Option<SocialLinks>,
}

/// Settings form as submitted.
///
/// The admin form loads the saved record (`phone`, `facebook`, ...) and
/// edits its own keys (`phone1`, `facebookUrl`, ...) on top before posting
/// the whole object back, so the form's keys win over the stored ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SettingsForm {
    institution_name: Option<String>,
    tagline: Option<String>,
    hero_verse: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    phone1: Option<String>,
    phone_secondary: Option<String>,
    phone2: Option<String>,
    address: Option<String>,
    facebook: Option<String>,
    facebook_url: Option<String>,
    twitter: Option<String>,
    twitter_url: Option<String>,
    instagram: Option<String>,
    instagram_url: Option<String>,
    youtube: Option<String>,
    youtube_url: Option<String>,
    socials: Option<SocialLinks>,
}

impl From<SettingsForm> for SettingsInput {
    fn from(form: SettingsForm) -> Self {
        SettingsInput {
            institution_name: form.institution_name,
            tagline: form.tagline,
            hero_verse: form.hero_verse,
            email: form.email,
            phone: reconcile(form.phone1, form.phone),
            phone_secondary: reconcile(form.phone2, form.phone_secondary),
            address: form.address,
            facebook: reconcile(form.facebook_url, form.facebook),
            twitter: reconcile(form.twitter_url, form.twitter),
            instagram: reconcile(form.instagram_url, form.instagram),
            youtube: reconcile(form.youtube_url, form.youtube),
            socials: form.socials,
        }
    }
}

impl SettingsInput {
    /// Resolve into a complete record. Saving always replaces the whole record.
    pub fn into_settings(self, updated_at: DateTime<Utc>) -> Settings {
        let socials = self.socials.unwrap_or_default();
        let link = |top: Option<String>, nested: Option<String>| {
            top.or(nested)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| UNSET_SOCIAL_LINK.to_string())
        };

        Settings {
            institution_name: self.institution_name.unwrap_or_default(),
            tagline: self.tagline.unwrap_or_default(),
            hero_verse: self.hero_verse.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            phone_secondary: self.phone_secondary.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            facebook: link(self.facebook, socials.facebook),
            twitter: link(self.twitter, socials.twitter),
            instagram: link(self.instagram, socials.instagram),
            youtube: link(self.youtube, socials.youtube),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_form_aliases() {
        let input: SettingsInput = serde_json::from_value(json!({
            "institutionName": "Darul Huda Academy",
            "phone1": "+91 11111",
            "phone2": "+91 22222",
            "facebookUrl": "https://facebook.com/darulhuda",
        }))
        .unwrap();

        let settings = input.into_settings(Utc::now());
        assert_eq!(settings.institution_name, "Darul Huda Academy");
        assert_eq!(settings.phone, "+91 11111");
        assert_eq!(settings.phone_secondary, "+91 22222");
        assert_eq!(settings.facebook, "https://facebook.com/darulhuda");
        assert_eq!(settings.twitter, UNSET_SOCIAL_LINK);
    }

    #[test]
    fn test_form_keys_win_over_saved_record_keys() {
        let saved = SettingsInput {
            institution_name: Some("Darul Huda Academy".to_string()),
            phone: Some("111".to_string()),
            facebook: Some("https://facebook.com/old".to_string()),
            ..Default::default()
        }
        .into_settings(Utc::now());

        // What the admin form posts back: the loaded record plus its own edits.
        let mut body = serde_json::to_value(&saved).unwrap();
        body["phone1"] = json!("222");
        body["facebookUrl"] = json!("https://facebook.com/new");

        let settings = serde_json::from_value::<SettingsInput>(body)
            .unwrap()
            .into_settings(Utc::now());
        assert_eq!(settings.phone, "222");
        assert_eq!(settings.facebook, "https://facebook.com/new");
        assert_eq!(settings.institution_name, "Darul Huda Academy");
    }

    #[test]
    fn test_nested_socials_fill_missing_links() {
        let input: SettingsInput = serde_json::from_value(json!({
            "institutionName": "Darul Huda Academy",
            "youtube": "https://youtube.com/@darulhuda",
            "socials": {
                "instagram": "https://instagram.com/darulhuda",
                "youtube": "https://youtube.com/ignored",
            },
        }))
        .unwrap();

        let settings = input.into_settings(Utc::now());
        assert_eq!(settings.instagram, "https://instagram.com/darulhuda");
        assert_eq!(settings.youtube, "https://youtube.com/@darulhuda");
        assert_eq!(settings.facebook, UNSET_SOCIAL_LINK);
    }
}
