//! Page-level loaders
//!
//! Each loader issues the fetches one screen needs, concurrently, under
//! that screen's page key.

use serde::Serialize;

use crate::loading::Page;

use super::client::{ContentClient, ContentError};
use super::models::{Article, Country, Destination};

/// Everything the home screen renders
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeContent {
    pub destinations: Vec<Destination>,
    pub articles: Vec<Article>,
}

/// Everything the discover screen renders
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoverContent {
    pub destinations: Vec<Destination>,
    pub countries: Vec<Country>,
}

/// Loads whole screens through a [`ContentClient`]
#[derive(Debug, Clone)]
pub struct PageLoader {
    client: ContentClient,
}

impl PageLoader {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    /// Blocking load of the home screen
    ///
    /// Both fetches count against `home`; the page stays loading until the
    /// last of them settles, whichever order they finish in.
    pub async fn load_home(&self) -> Result<HomeContent, ContentError> {
        let page = Page::home();
        let (destinations, articles) = tokio::join!(
            self.client.destinations(&page, false),
            self.client.articles(&page, false),
        );

        Ok(HomeContent {
            destinations: destinations?,
            articles: articles?,
        })
    }

    /// Blocking load of the discover screen
    pub async fn load_discover(&self) -> Result<DiscoverContent, ContentError> {
        let page = Page::discover();
        let (destinations, countries) = tokio::join!(
            self.client.destinations(&page, false),
            self.client.countries(&page, false),
        );

        Ok(DiscoverContent {
            destinations: destinations?,
            countries: countries?,
        })
    }

    /// Blocking load of a single article
    pub async fn load_article(&self, id: &str) -> Result<Article, ContentError> {
        self.client.article(id, &Page::article(), false).await
    }

    /// Background refresh of the article list shown on `page`
    ///
    /// Content-only: the page shows an inline indicator instead of a
    /// skeleton while this runs.
    pub async fn refresh_articles(&self, page: &Page) -> Result<Vec<Article>, ContentError> {
        self.client.articles(page, true).await
    }

    /// Background refresh of the destination list shown on `page`
    pub async fn refresh_destinations(&self, page: &Page) -> Result<Vec<Destination>, ContentError> {
        self.client.destinations(page, true).await
    }
}
