//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use garuda_core::content::{ContactContent, HeroContent, MissionContent, StatsContent};

use crate::content::{ContentSource, load_or_default};
use crate::showcase::Showcase;
use crate::state::AppState;

// =============================================================================
// Static sections
// =============================================================================

/// One card in the "Areas of Work" grid.
#[derive(Debug, Clone, Copy)]
pub struct WorkArea {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub quote: &'static str,
}

/// A community voice in the trust section.
#[derive(Debug, Clone, Copy)]
pub struct Testimonial {
    pub quote: &'static str,
    pub name: &'static str,
    pub role: &'static str,
}

pub const WORK_AREAS: [WorkArea; 6] = [
    WorkArea {
        icon: "🛕",
        title: "Temple Restoration",
        description: "Reviving sacred spaces",
        quote: "Where sacred stone meets living spirit.",
    },
    WorkArea {
        icon: "🐄",
        title: "Goshala Management",
        description: "Protecting divine creatures",
        quote: "Protecting those who protect our land.",
    },
    WorkArea {
        icon: "👩🏽‍🌾",
        title: "Women Empowerment",
        description: "Skills for independence",
        quote: "Freedom begins with dignity and skill.",
    },
    WorkArea {
        icon: "🛠️",
        title: "Skill Development",
        description: "Traditional crafts revival",
        quote: "Crafting futures with every tool.",
    },
    WorkArea {
        icon: "🏠",
        title: "Child Homes",
        description: "Nurturing future leaders",
        quote: "Every child deserves a sacred start.",
    },
    WorkArea {
        icon: "🌿",
        title: "R&D Ayurveda (Dhanvantri)",
        description: "Ancient healing wisdom",
        quote: "Ancient science for future healing.",
    },
];

pub const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        quote: "Garuda Dhruvam's temple work rekindled our community's spiritual heartbeat.",
        name: "Aruna Devi",
        role: "Kurnool Temple Priestess",
    },
    Testimonial {
        quote: "The skill training gave me independence I never thought possible.",
        name: "Lakshmi Reddy",
        role: "Artisan, Anantapur",
    },
    Testimonial {
        quote: "They don't just restore temples; they restore hope in our villages.",
        name: "Rama Krishna",
        role: "Village Elder, Chittoor",
    },
];

// =============================================================================
// Page
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: HeroContent,
    pub mission: MissionContent,
    pub stats: [(&'static str, String); 4],
    pub contact: ContactContent,
    pub work_areas: &'static [WorkArea],
    pub testimonials: &'static [Testimonial],
    pub showcase: Showcase,
}

impl HomeTemplate {
    /// Hydrate every editable section, each independently defaulted.
    pub async fn hydrate(source: &dyn ContentSource) -> Self {
        let (hero, mission, stats, contact, showcase) = tokio::join!(
            load_or_default::<HeroContent>(source),
            load_or_default::<MissionContent>(source),
            load_or_default::<StatsContent>(source),
            load_or_default::<ContactContent>(source),
            Showcase::load(source),
        );

        Self {
            hero,
            mission,
            stats: stats.display_pairs(),
            contact,
            work_areas: &WORK_AREAS,
            testimonials: &TESTIMONIALS,
            showcase,
        }
    }
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    HomeTemplate::hydrate(state.content()).await
}
