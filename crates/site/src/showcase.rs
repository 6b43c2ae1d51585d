//! "Stories from the Ground": published stories beside a gallery strip.
//!
//! Both lists are read from the dashboard's `stories` and `gallery` tables.
//! Until something is published, or while the database is unreachable, the
//! section shows the placeholder stories and captions below.

use tracing::error;

use crate::content::ContentSource;

/// Stories shown in the teaser.
pub const STORY_LIMIT: i64 = 3;

/// Gallery tiles shown in the teaser.
pub const IMAGE_LIMIT: i64 = 4;

/// A published story, shortened for the home page.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoryTeaser {
    pub title: String,
    pub snippet: String,
    pub read_time_minutes: i32,
}

/// A gallery tile. Placeholder tiles have no image.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GalleryTeaser {
    pub title: String,
    pub image_url: Option<String>,
    pub alt: String,
}

/// Both halves of the teaser, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Showcase {
    pub stories: Vec<StoryTeaser>,
    pub images: Vec<GalleryTeaser>,
}

impl Showcase {
    /// Load both lists, each falling back to its placeholders independently.
    pub async fn load(source: &dyn ContentSource) -> Self {
        let (stories, images) = tokio::join!(
            source.published_stories(STORY_LIMIT),
            source.gallery_images(IMAGE_LIMIT),
        );

        let stories = match stories {
            Ok(stories) if !stories.is_empty() => stories,
            Ok(_) => default_stories(),
            Err(e) => {
                error!(error = %e, "Failed to load stories, using placeholders");
                default_stories()
            }
        };
        let images = match images {
            Ok(images) if !images.is_empty() => images,
            Ok(_) => default_images(),
            Err(e) => {
                error!(error = %e, "Failed to load gallery, using placeholders");
                default_images()
            }
        };

        Self { stories, images }
    }
}

fn default_stories() -> Vec<StoryTeaser> {
    [
        (
            "From Ruins to Reverence: Kurnool Temple Revival",
            "How a forgotten 400-year-old temple became the heart of community life again...",
            5,
        ),
        (
            "Weaving Dreams: Women Artisans of Anantapur",
            "Traditional handloom skills create modern livelihoods for 200+ women...",
            3,
        ),
        (
            "Goshala Chronicles: Caring for Sacred Cows",
            "Sustainable cow care practices that benefit both animals and farmers...",
            4,
        ),
    ]
    .into_iter()
    .map(|(title, snippet, minutes)| StoryTeaser {
        title: title.to_string(),
        snippet: snippet.to_string(),
        read_time_minutes: minutes,
    })
    .collect()
}

fn default_images() -> Vec<GalleryTeaser> {
    [
        ("Kurnool Temple Revival", "Temple restoration before and after"),
        ("Artisan Training Program", "Women weaving traditional textiles"),
        ("Cultural Education", "Children learning in temple courtyard"),
        ("Heritage Art Revival", "Artisans painting traditional motifs"),
    ]
    .into_iter()
    .map(|(title, alt)| GalleryTeaser {
        title: title.to_string(),
        image_url: None,
        alt: alt.to_string(),
    })
    .collect()
}
