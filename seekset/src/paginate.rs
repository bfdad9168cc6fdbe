//! Keyset and offset orchestrators.
//!
//! # Queries per keyset request
//!
//! | Query      | When                                         |
//! |------------|----------------------------------------------|
//! | count      | always                                       |
//! | page fetch | always                                       |
//! | probe      | `has_previous`, unless known from the intent |
//! | probe      | `has_next`, unless known from the intent     |
//!
//! The count runs concurrently with reference resolution and the page
//! fetch; the two probes run concurrently with each other.

use std::future::{Future, Ready, ready};

use futures::{join, try_join};
use tracing::{debug, instrument};

use crate::compile::{compile, seek_after};
use crate::error::PaginationError;
use crate::options::PaginationOptions;
use crate::ordering::{KeysetBuilder, KeysetDefinition, SortKey, TraversalDirection};
use crate::page::{KeysetPage, OffsetPage};
use crate::predicate::Predicate;
use crate::request::{KeysetRequest, NavigationIntent, OffsetRequest, ReferenceToken};
use crate::source::{Query, Queryable};

/// A resolver for requests that never carry a reference.
///
/// Pass it for `First`/`Last` requests; an `After`/`Before` request
/// resolved with it fails with [`PaginationError::ReferenceNotFound`].
pub fn no_reference<T, E>(_token: ReferenceToken) -> Ready<Result<Option<T>, E>> {
    ready(Ok(None))
}

/// Runs page requests against a [`Queryable`] under fixed options.
///
/// Stateless apart from the options; share one across requests.
///
/// ```
/// use seekset::{KeysetDefinition, KeysetRequest, MemSource, Paginator};
///
/// #[derive(Clone)]
/// struct Order { id: i64 }
///
/// let source = MemSource::new((1..=30).map(|id| Order { id }).collect());
/// let keyset = KeysetDefinition::build(|b| b.ascending("id", |o: &Order| o.id)).unwrap();
/// let paginator = Paginator::default();
///
/// let page = futures::executor::block_on(paginator.keyset(
///     &source,
///     &keyset,
///     &KeysetRequest::after(20),
///     |token| {
///         let found = source.find(|o| Some(o.id) == token.as_int());
///         async move { Ok(found) }
///     },
/// ))
/// .unwrap();
///
/// assert_eq!(page.data.first().map(|o| o.id), Some(21));
/// assert!(page.has_previous);
/// assert!(!page.has_next);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    options: PaginationOptions,
}

impl Paginator {
    /// Create a paginator with the given options.
    #[must_use]
    pub const fn new(options: PaginationOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    #[must_use]
    pub const fn options(&self) -> &PaginationOptions {
        &self.options
    }

    fn check_options<E>(&self) -> Result<(), PaginationError<E>> {
        self.options
            .validate()
            .map_err(|e| PaginationError::InvalidArgument(e.to_string()))
    }

    /// Fetch one keyset page.
    ///
    /// `resolve` maps the request's reference token to a row; it is only
    /// awaited for `After`/`Before` requests, and a `None` result fails with
    /// [`PaginationError::ReferenceNotFound`]. An empty source returns an
    /// empty page for every intent, even with an unresolvable reference;
    /// data source errors still propagate.
    ///
    /// When an `After`/`Before` page comes back empty, the opposite flag is
    /// probed strictly beyond the reference, so the reference row itself
    /// does not count: with a single row `r`, `After(r)` reports
    /// `has_previous == false`.
    #[instrument(skip_all, fields(intent = ?request.intent))]
    pub async fn keyset<S, R, Fut>(
        &self,
        source: &S,
        definition: &KeysetDefinition<S::Item>,
        request: &KeysetRequest,
        resolve: R,
    ) -> Result<KeysetPage<S::Item>, PaginationError<S::Error>>
    where
        S: Queryable,
        R: FnOnce(ReferenceToken) -> Fut,
        Fut: Future<Output = Result<Option<S::Item>, S::Error>>,
    {
        self.check_options()?;
        let page_size = self.options.resolve_size(request.size);
        let intent = &request.intent;

        let (total_count, fetched) = join!(
            source.count(&Predicate::Always),
            fetch_keyset_page(source, definition, intent, page_size, resolve)
        );
        let total_count = total_count.map_err(PaginationError::Source)?;
        if total_count == 0 {
            // An unresolvable reference is expected here; source failures are not.
            if let Err(err @ PaginationError::Source(_)) = fetched {
                return Err(err);
            }
            debug!(page_size, "empty source");
            return Ok(KeysetPage::empty(0, page_size));
        }
        let (data, reference) = fetched?;

        let forward = definition.effective_order(TraversalDirection::Forward);
        let backward = definition.effective_order(TraversalDirection::Backward);

        // Probe filters; `None` means the flag is known to be false.
        let (previous, next) = match (data.first(), data.last(), reference.as_ref()) {
            (Some(first), Some(last), _) => (
                (!matches!(intent, NavigationIntent::First)).then(|| seek_after(&backward, first)),
                (!matches!(intent, NavigationIntent::Last)).then(|| seek_after(&forward, last)),
            ),
            (_, _, Some(reference)) => match intent {
                NavigationIntent::After(_) => (Some(seek_after(&backward, reference)), None),
                NavigationIntent::Before(_) => (None, Some(seek_after(&forward, reference))),
                NavigationIntent::First | NavigationIntent::Last => (None, None),
            },
            _ => (None, None),
        };

        let (has_previous, has_next) =
            try_join!(probe(source, previous), probe(source, next)).map_err(PaginationError::Source)?;

        debug!(
            page_size,
            total_count,
            rows = data.len(),
            has_previous,
            has_next,
            "keyset page"
        );

        Ok(KeysetPage {
            data,
            total_count,
            page_size,
            has_previous,
            has_next,
        })
    }

    /// Fetch one keyset page, declaring the ordering inline.
    ///
    /// Convenient for one-off orderings; build the definition once and use
    /// [`Paginator::keyset`] on hot paths.
    pub async fn keyset_with<S, D, R, Fut>(
        &self,
        source: &S,
        declare: D,
        request: &KeysetRequest,
        resolve: R,
    ) -> Result<KeysetPage<S::Item>, PaginationError<S::Error>>
    where
        S: Queryable,
        D: FnOnce(KeysetBuilder<S::Item>) -> KeysetBuilder<S::Item>,
        R: FnOnce(ReferenceToken) -> Fut,
        Fut: Future<Output = Result<Option<S::Item>, S::Error>>,
    {
        let definition = KeysetDefinition::build(declare)?;
        self.keyset(source, &definition, request, resolve).await
    }

    /// Fetch one offset page in the source's natural order.
    pub async fn offset<S>(
        &self,
        source: &S,
        request: &OffsetRequest,
    ) -> Result<OffsetPage<S::Item>, PaginationError<S::Error>>
    where
        S: Queryable,
    {
        self.offset_ordered(source, Vec::new(), request).await
    }

    /// Fetch one offset page sorted by a keyset definition.
    pub async fn offset_sorted<S>(
        &self,
        source: &S,
        definition: &KeysetDefinition<S::Item>,
        request: &OffsetRequest,
    ) -> Result<OffsetPage<S::Item>, PaginationError<S::Error>>
    where
        S: Queryable,
    {
        let order = definition.effective_order(TraversalDirection::Forward);
        self.offset_ordered(source, order, request).await
    }

    #[instrument(skip_all, fields(page = request.page))]
    async fn offset_ordered<S>(
        &self,
        source: &S,
        order: Vec<SortKey<S::Item>>,
        request: &OffsetRequest,
    ) -> Result<OffsetPage<S::Item>, PaginationError<S::Error>>
    where
        S: Queryable,
    {
        self.check_options()?;
        let page_size = self.options.resolve_size(request.size);
        let page = request.effective_page();
        let query = Query::window((page - 1).saturating_mul(page_size), page_size).order_by(order);

        let (total_count, data) = try_join!(source.count(&Predicate::Always), source.fetch(&query))
            .map_err(PaginationError::Source)?;

        debug!(page, page_size, total_count, rows = data.len(), "offset page");
        Ok(OffsetPage {
            data,
            total_count,
            page_size,
            page,
        })
    }

    /// Offset pagination over rows already in memory.
    pub fn offset_slice<T: Clone>(
        &self,
        rows: &[T],
        request: &OffsetRequest,
    ) -> Result<OffsetPage<T>, PaginationError> {
        self.check_options()?;
        let page_size = self.options.resolve_size(request.size);
        let page = request.effective_page();
        let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);

        Ok(OffsetPage {
            data: rows.iter().skip(skip).take(take).cloned().collect(),
            total_count: rows.len() as u64,
            page_size,
            page,
        })
    }
}

/// Resolve the reference, then fetch the page in logical order.
async fn fetch_keyset_page<S, R, Fut>(
    source: &S,
    definition: &KeysetDefinition<S::Item>,
    intent: &NavigationIntent,
    page_size: u64,
    resolve: R,
) -> Result<(Vec<S::Item>, Option<S::Item>), PaginationError<S::Error>>
where
    S: Queryable,
    R: FnOnce(ReferenceToken) -> Fut,
    Fut: Future<Output = Result<Option<S::Item>, S::Error>>,
{
    let reference = match intent.reference() {
        Some(token) => {
            let row = resolve(token.clone()).await.map_err(PaginationError::Source)?;
            Some(row.ok_or_else(|| PaginationError::ReferenceNotFound(token.clone()))?)
        },
        None => None,
    };

    let direction = intent.direction();
    let compiled = compile(definition, direction, reference.as_ref());
    debug!(?direction, predicate = %compiled.predicate, "compiled seek");

    let mut rows = source
        .fetch(&Query::seek(compiled, page_size))
        .await
        .map_err(PaginationError::Source)?;
    if direction == TraversalDirection::Backward {
        rows.reverse();
    }
    Ok((rows, reference))
}

async fn probe<S: Queryable>(
    source: &S,
    filter: Option<Predicate<S::Item>>,
) -> Result<bool, S::Error> {
    match filter {
        Some(filter) => source.exists(&filter).await,
        None => Ok(false),
    }
}
