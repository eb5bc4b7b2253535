//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use super::NavContext;
use crate::content::{self, Feature, Specialty, Stat};
use crate::filters;
use crate::session::RequestSession;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavContext,
    pub stats: &'static [Stat],
    pub features: &'static [Feature],
    pub specialties: &'static [Specialty],
}

/// Display the home page.
#[instrument(skip(session))]
pub async fn home(session: RequestSession) -> impl IntoResponse {
    HomeTemplate {
        nav: NavContext::from_session(&session).await,
        stats: content::STATS,
        features: content::FEATURES,
        specialties: content::SPECIALTIES,
    }
}
