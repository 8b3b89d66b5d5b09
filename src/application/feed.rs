//! Post rendering pipeline: maps stored posts to public listing and detail
//! views. Pure and deterministic given the records; date formatting uses a
//! fixed en-US style locale.

use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::application::repos::{PostsRepo, RepoError};
use crate::config::SiteSettings;
use crate::domain::entities::PostRecord;
use crate::presentation::views::{ListingContext, PageMetaView, PostCard, PostDetailContext};

const CARD_DESCRIPTION_MAX_CHARS: usize = 160;

/// Which audience a listing is built for. Status badges are admin-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    Public,
    Admin,
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    site: SiteSettings,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, site: SiteSettings) -> Self {
        Self { posts, site }
    }

    /// Published posts as listing cards, newest first.
    pub async fn public_listing(&self) -> Result<ListingContext, RepoError> {
        let records = self.posts.list_published().await?;
        Ok(ListingContext {
            cards: records
                .iter()
                .map(|record| post_card(record, ListingScope::Public))
                .collect(),
        })
    }

    /// The detail view for a published post, or `None` when the slug does
    /// not resolve to a published post.
    pub async fn published_detail(
        &self,
        slug: &str,
    ) -> Result<Option<PostDetailContext>, RepoError> {
        let record = self.posts.find_published_by_slug(slug).await?;
        Ok(record.map(|record| detail_context(&record, &self.site)))
    }

    /// Site-level metadata for pages that are not a single post.
    pub fn base_meta(&self, path: &str) -> PageMetaView {
        PageMetaView {
            title: self.site.brand_title.clone(),
            description: String::new(),
            canonical: canonical_url(&self.site.public_url, path),
            og_image: None,
            published_iso: None,
            updated_iso: None,
        }
    }
}

/// Build a listing card from a stored post. The status badge only appears
/// for the admin audience.
pub fn post_card(record: &PostRecord, scope: ListingScope) -> PostCard {
    PostCard {
        href: format!("/blog/{}", record.slug),
        title: record.title.clone(),
        description: truncate_description(&record.meta_description, CARD_DESCRIPTION_MAX_CHARS),
        display_date: format_long_date(record.created_at),
        iso_date: format_rfc3339(record.created_at),
        status_badge: match scope {
            ListingScope::Public => None,
            ListingScope::Admin => Some(record.status),
        },
        cover_image: record.cover_image.clone(),
    }
}

/// Build the full detail view for a post. The stored markup is embedded
/// verbatim: it is author-trusted input and deliberately not sanitized.
pub fn detail_context(record: &PostRecord, site: &SiteSettings) -> PostDetailContext {
    let meta_title = if record.meta_title.trim().is_empty() {
        record.title.clone()
    } else {
        record.meta_title.clone()
    };

    PostDetailContext {
        title: record.title.clone(),
        content_html: record.content_html.clone(),
        cover_image: record.cover_image.clone(),
        published_display: format_long_date(record.created_at),
        published_iso: format_rfc3339(record.created_at),
        updated_display: record.was_updated().then(|| format_long_date(record.updated_at)),
        meta: PageMetaView {
            title: meta_title,
            description: record.meta_description.clone(),
            canonical: canonical_url(&site.public_url, &format!("/blog/{}", record.slug)),
            og_image: record.cover_image.clone(),
            published_iso: Some(format_rfc3339(record.created_at)),
            updated_iso: Some(format_rfc3339(record.updated_at)),
        },
    }
}

/// Fixed-locale long date, e.g. `January 2, 2025`.
pub fn format_long_date(moment: OffsetDateTime) -> String {
    let format = format_description!("[month repr:long] [day padding:none], [year]");
    moment
        .format(&format)
        .unwrap_or_else(|_| moment.date().to_string())
}

fn format_rfc3339(moment: OffsetDateTime) -> String {
    moment
        .format(&Rfc3339)
        .unwrap_or_else(|_| moment.unix_timestamp().to_string())
}

/// Truncate to at most `max_chars` characters on a character boundary,
/// appending an ellipsis when anything was cut.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let mut truncated: String = trimmed.chars().take(max_chars).collect();
    while truncated.ends_with(char::is_whitespace) {
        truncated.pop();
    }
    truncated.push('…');
    truncated
}

fn canonical_url(public_url: &str, path: &str) -> String {
    format!("{}{}", public_url.trim_end_matches('/'), path)
}
