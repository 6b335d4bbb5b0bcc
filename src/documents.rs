//! Singleton site documents.
//!
//! Each type here lives in its own singleton collection: the store holds at most
//! one document per [`SingletonKind`]. `Default` yields the document seeded by the
//! bootstrapper when the collection is empty, and `#[serde(default)]` lets a stored
//! body that predates a field still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// SingletonKind
///
/// Key of a singleton collection. `as_str` is the value stored in
/// `site_documents.kind`, which carries a unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingletonKind {
    SiteSettings,
    FooterSettings,
    NavbarSettings,
    About,
    ContactInfo,
    ServicesPageSettings,
}

impl SingletonKind {
    pub const ALL: [SingletonKind; 6] = [
        Self::SiteSettings,
        Self::FooterSettings,
        Self::NavbarSettings,
        Self::About,
        Self::ContactInfo,
        Self::ServicesPageSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SiteSettings => "site_settings",
            Self::FooterSettings => "footer_settings",
            Self::NavbarSettings => "navbar_settings",
            Self::About => "about",
            Self::ContactInfo => "contact_info",
            Self::ServicesPageSettings => "services_page_settings",
        }
    }
}

/// StoredDocument
///
/// Untyped row of `site_documents`. The bootstrapper decodes `body` into the
/// concrete [`SingletonDocument`] for its kind.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredDocument {
    pub id: Uuid,
    pub body: sqlx::types::Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A typed singleton document.
pub trait SingletonDocument:
    Serialize + DeserializeOwned + Default + Send + Sync + 'static
{
    const KIND: SingletonKind;

    /// Schema rules beyond what deserialization enforces.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Singleton
///
/// A decoded singleton document together with its store metadata. Serializes flat:
/// `{ "id": ..., "createdAt": ..., "updatedAt": ..., <document fields> }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Singleton<D> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub document: D,
}

fn non_empty(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

fn s(value: &str) -> String {
    value.to_string()
}

// --- Site settings ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct HeroButton {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct CtaButton {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub style: ButtonStyle,
    #[serde(default)]
    pub order: i32,
}

/// SiteSettings
///
/// Hero, services, portfolio and call-to-action copy of the home page, plus the
/// page titles of the about and services pages.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct SiteSettings {
    pub hero_image: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_button: HeroButton,
    pub services_title: String,
    pub no_services_message: String,
    pub no_services_button_label: String,
    pub no_services_button_url: String,
    pub portfolio_title: String,
    pub cta_title: String,
    pub cta_description: String,
    pub cta_buttons: Vec<CtaButton>,
    pub about_page_title: String,
    pub about_page_subtitle: String,
    pub services_page_title: String,
    pub services_page_subtitle: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            hero_image: s("https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=400"),
            hero_title: s("Professional Modeling Services"),
            hero_subtitle: s(
                "Elevate your brand with experienced, versatile modeling for fashion, events, and content creation.",
            ),
            hero_button: HeroButton {
                label: s("Order Service"),
                url: s("/services"),
            },
            services_title: s("Our Services"),
            no_services_message: s("No services available yet. Check back soon!"),
            no_services_button_label: s("Contact Us"),
            no_services_button_url: s("/contact"),
            portfolio_title: s("Portfolio"),
            cta_title: s("Ready to Work Together?"),
            cta_description: s(
                "Let's create something amazing. Get in touch to discuss your project.",
            ),
            cta_buttons: vec![
                CtaButton {
                    label: s("View Services"),
                    url: s("/services"),
                    style: ButtonStyle::Primary,
                    order: 1,
                },
                CtaButton {
                    label: s("Contact Us"),
                    url: s("/contact"),
                    style: ButtonStyle::Secondary,
                    order: 2,
                },
            ],
            about_page_title: s("About Me"),
            about_page_subtitle: s("Professional Model & Content Creator"),
            services_page_title: s("Our Services"),
            services_page_subtitle: s("Professional modeling services tailored to your needs"),
        }
    }
}

impl SingletonDocument for SiteSettings {
    const KIND: SingletonKind = SingletonKind::SiteSettings;

    fn validate(&self) -> Result<(), String> {
        non_empty(&self.hero_image, "Hero image URL")?;
        for button in &self.cta_buttons {
            non_empty(&button.label, "Button label")?;
            non_empty(&button.url, "Button URL")?;
        }
        Ok(())
    }
}

// --- Footer ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct QuickLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct FooterSettings {
    pub brand_name: String,
    pub brand_description: String,
    pub quick_links: Vec<QuickLink>,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_location: String,
    pub copyright_text: String,
}

impl Default for FooterSettings {
    fn default() -> Self {
        let link = |label: &str, url: &str| QuickLink {
            label: s(label),
            url: s(url),
        };
        Self {
            brand_name: s("ModelPro"),
            brand_description: s(
                "Professional modeling services for brands, events, and content creation.",
            ),
            quick_links: vec![
                link("Home", "/"),
                link("About", "/about"),
                link("Services", "/services"),
                link("Contact", "/contact"),
            ],
            contact_email: s("contact@modelpro.com"),
            contact_phone: s("+1 (555) 123-4567"),
            contact_location: s("New York, NY"),
            copyright_text: s("ModelPro. All rights reserved."),
        }
    }
}

impl SingletonDocument for FooterSettings {
    const KIND: SingletonKind = SingletonKind::FooterSettings;

    fn validate(&self) -> Result<(), String> {
        for link in &self.quick_links {
            non_empty(&link.label, "Link label")?;
            non_empty(&link.url, "Link URL")?;
        }
        Ok(())
    }
}

// --- Navbar ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct NavLink {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct NavbarSettings {
    pub site_name: String,
    pub nav_links: Vec<NavLink>,
}

impl Default for NavbarSettings {
    fn default() -> Self {
        let link = |label: &str, url: &str, order: i32| NavLink {
            label: s(label),
            url: s(url),
            order,
        };
        Self {
            site_name: s("ModelPro"),
            nav_links: vec![
                link("Home", "/", 1),
                link("About", "/about", 2),
                link("Services", "/services", 3),
                link("Contact", "/contact", 4),
            ],
        }
    }
}

impl SingletonDocument for NavbarSettings {
    const KIND: SingletonKind = SingletonKind::NavbarSettings;

    fn validate(&self) -> Result<(), String> {
        for link in &self.nav_links {
            non_empty(&link.label, "Link label")?;
            non_empty(&link.url, "Link URL")?;
        }
        Ok(())
    }
}

// --- About ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct Experience {
    pub year: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct Skill {
    pub name: String,
    /// Proficiency percentage, 0 to 100.
    pub level: i32,
    #[serde(default)]
    pub order: i32,
}

/// About
///
/// Profile bio, experience timeline and skill bars of the about page.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct About {
    pub profile_image: String,
    pub story_title: String,
    pub story_content: String,
    pub experiences: Vec<Experience>,
    pub skills: Vec<Skill>,
}

impl Default for About {
    fn default() -> Self {
        let skill = |name: &str, level: i32, order: i32| Skill {
            name: s(name),
            level,
            order,
        };
        Self {
            profile_image: s("https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=800"),
            story_title: s("My Story"),
            story_content: s(
                "I am a professional model with years of experience in the fashion industry. My passion for modeling started at a young age, and I have worked with numerous brands and designers around the world.",
            ),
            experiences: vec![
                Experience {
                    year: s("2020-Present"),
                    title: s("Professional Model"),
                    description: s("Working with international brands and fashion houses"),
                    order: 0,
                },
                Experience {
                    year: s("2018-2020"),
                    title: s("Fashion Model"),
                    description: s("Runway and editorial modeling"),
                    order: 1,
                },
            ],
            skills: vec![
                skill("Runway Modeling", 95, 0),
                skill("Photo Shoots", 90, 1),
                skill("Commercial Modeling", 85, 2),
            ],
        }
    }
}

impl SingletonDocument for About {
    const KIND: SingletonKind = SingletonKind::About;

    fn validate(&self) -> Result<(), String> {
        non_empty(&self.profile_image, "Profile image")?;
        non_empty(&self.story_title, "Story title")?;
        non_empty(&self.story_content, "Story content")?;
        for experience in &self.experiences {
            non_empty(&experience.year, "Experience year")?;
            non_empty(&experience.title, "Experience title")?;
            non_empty(&experience.description, "Experience description")?;
        }
        for skill in &self.skills {
            non_empty(&skill.name, "Skill name")?;
            if !(0..=100).contains(&skill.level) {
                return Err(format!("Skill level for {} must be between 0 and 100", skill.name));
            }
        }
        Ok(())
    }
}

// --- Contact info ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct BusinessHours {
    pub weekday: String,
    pub weekend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LegalTerms {
    pub copyright: String,
    pub refund_policy: String,
    pub service_agreement: String,
    pub privacy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ContactInfo {
    pub header_title: String,
    pub header_subtitle: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub business_hours: BusinessHours,
    pub social_media: Vec<SocialLink>,
    pub legal_terms: LegalTerms,
}

impl Default for ContactInfo {
    fn default() -> Self {
        let social = |name: &str, url: &str, icon: &str| SocialLink {
            name: s(name),
            url: s(url),
            icon: s(icon),
        };
        Self {
            header_title: s("Get In Touch"),
            header_subtitle: s("Let's discuss how we can work together"),
            email: s("contact@modelpro.com"),
            phone: s("+1 (555) 123-4567"),
            location: s("New York, NY"),
            business_hours: BusinessHours {
                weekday: s("Monday - Friday: 9AM - 6PM EST"),
                weekend: s("Weekend: By Appointment"),
            },
            social_media: vec![
                social("Facebook", "https://facebook.com", "📘"),
                social("Instagram", "https://instagram.com", "📷"),
                social("LinkedIn", "https://linkedin.com", "💼"),
                social("Twitter", "https://twitter.com", "🐦"),
                social("TikTok", "https://tiktok.com", "🎵"),
            ],
            legal_terms: LegalTerms {
                copyright: s(
                    "All content, photographs, videos, and materials created during our collaboration remain the intellectual property of ModelPro. The customer may not republish, redistribute, or resell any content without explicit written permission.",
                ),
                refund_policy: s(
                    "All services are final sale. Once a service has been booked and scheduled, no refunds will be issued. In case of cancellation, credits may be offered for future services at our discretion.",
                ),
                service_agreement: s(
                    "By requesting a service, you agree to our terms and conditions. All projects require a signed agreement before work begins. Payment terms and schedules will be outlined in the service agreement.",
                ),
                privacy: s(
                    "We respect your privacy and maintain confidentiality of all client information. Personal data is protected in accordance with applicable privacy laws.",
                ),
            },
        }
    }
}

impl SingletonDocument for ContactInfo {
    const KIND: SingletonKind = SingletonKind::ContactInfo;

    fn validate(&self) -> Result<(), String> {
        non_empty(&self.email, "Email")?;
        non_empty(&self.phone, "Phone")?;
        non_empty(&self.location, "Location")?;
        for link in &self.social_media {
            non_empty(&link.name, "Social media name")?;
            non_empty(&link.url, "Social media URL")?;
        }
        Ok(())
    }
}

// --- Services page ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ServicesPageSettings {
    pub header_title: String,
    pub header_subtitle: String,
}

impl Default for ServicesPageSettings {
    fn default() -> Self {
        Self {
            header_title: s("Our Services"),
            header_subtitle: s("Professional modeling services tailored to your needs"),
        }
    }
}

impl SingletonDocument for ServicesPageSettings {
    const KIND: SingletonKind = SingletonKind::ServicesPageSettings;
}
