// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cursor-following iteration over paginated search endpoints.
//!
//! Search endpoints return pages of `(results, has_more, next_token)`.
//! [`paginate`] turns a "search one page" operation into a lazy stream of
//! records: it yields each page's results in server order and only issues
//! the next request at a page boundary. One stream is a single pass; to
//! iterate again, make a fresh call.

use std::future::Future;

use futures::stream::{self, Stream};
use tracing::warn;

use crate::error::Result;

/// A search request whose cursor can be advanced.
pub(crate) trait PageRequest: Clone {
    /// Replace the cursor, leaving every other field unchanged.
    fn set_next_token(&mut self, token: String);
}

/// One page of search results.
pub(crate) trait Page {
    type Item;

    /// Break the page into results, the has-more flag, and the cursor.
    fn into_parts(self) -> (Vec<Self::Item>, bool, Option<String>);
}

enum Walk<P, I> {
    Request(P),
    Drain(std::vec::IntoIter<I>, Option<P>),
    Done,
}

/// Lazily walk a paginated search, yielding every record.
///
/// After a page with `has_more = true`, the follow-up request carries that
/// page's `next_token` and is otherwise identical to the previous one. A
/// page claiming more results without a cursor ends the walk: the contract
/// leaves that case undefined, and stopping beats looping forever on a
/// cursor that never arrives.
pub(crate) fn paginate<P, Pg, F, Fut>(params: P, fetch: F) -> impl Stream<Item = Result<Pg::Item>>
where
    P: PageRequest,
    Pg: Page,
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<Pg>>,
{
    stream::try_unfold(
        (Walk::Request(params), fetch),
        |(mut walk, mut fetch)| async move {
            loop {
                match walk {
                    Walk::Request(params) => {
                        let page = fetch(params.clone()).await?;
                        let (results, has_more, next_token) = page.into_parts();
                        let next = if has_more {
                            match next_token {
                                Some(token) => {
                                    let mut next_params = params;
                                    next_params.set_next_token(token);
                                    Some(next_params)
                                }
                                None => {
                                    warn!(
                                        "search page reported more results but no next token; \
                                         ending iteration"
                                    );
                                    None
                                }
                            }
                        } else {
                            None
                        };
                        walk = Walk::Drain(results.into_iter(), next);
                    }
                    Walk::Drain(mut items, next) => match items.next() {
                        Some(item) => return Ok(Some((item, (Walk::Drain(items, next), fetch)))),
                        None => match next {
                            Some(params) => walk = Walk::Request(params),
                            None => walk = Walk::Done,
                        },
                    },
                    Walk::Done => return Ok(None),
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use futures::TryStreamExt;

    use super::*;
    use crate::error::Error;

    #[derive(Debug, Clone, PartialEq)]
    struct FakeParams {
        query: String,
        limit: Option<u32>,
        next_token: Option<String>,
    }

    impl PageRequest for FakeParams {
        fn set_next_token(&mut self, token: String) {
            self.next_token = Some(token);
        }
    }

    struct FakePage {
        results: Vec<&'static str>,
        has_more: bool,
        next_token: Option<String>,
    }

    impl Page for FakePage {
        type Item = &'static str;

        fn into_parts(self) -> (Vec<Self::Item>, bool, Option<String>) {
            (self.results, self.has_more, self.next_token)
        }
    }

    fn params() -> FakeParams {
        FakeParams {
            query: "tag:mri".to_string(),
            limit: Some(50),
            next_token: None,
        }
    }

    fn walk(
        pages: Vec<Result<FakePage>>,
    ) -> (
        impl Stream<Item = Result<&'static str>>,
        Rc<RefCell<Vec<FakeParams>>>,
    ) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let queue = RefCell::new(VecDeque::from(pages));
        let stream = paginate(params(), {
            let seen = Rc::clone(&seen);
            move |request: FakeParams| {
                seen.borrow_mut().push(request);
                let page = queue.borrow_mut().pop_front().unwrap();
                async move { page }
            }
        });
        (stream, seen)
    }

    #[tokio::test]
    async fn follows_the_cursor_and_keeps_other_fields_unchanged() {
        let (stream, seen) = walk(vec![
            Ok(FakePage {
                results: vec!["a", "b"],
                has_more: true,
                next_token: Some("X".to_string()),
            }),
            Ok(FakePage {
                results: vec!["c"],
                has_more: false,
                next_token: None,
            }),
        ]);

        let items: Vec<_> = stream.try_collect().await.unwrap();
        assert_eq!(items, vec!["a", "b", "c"]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], params());
        assert_eq!(
            seen[1],
            FakeParams {
                next_token: Some("X".to_string()),
                ..params()
            }
        );
    }

    #[tokio::test]
    async fn has_more_without_token_ends_the_walk() {
        let (stream, seen) = walk(vec![Ok(FakePage {
            results: vec!["a"],
            has_more: true,
            next_token: None,
        })]);

        let items: Vec<_> = stream.try_collect().await.unwrap();
        assert_eq!(items, vec!["a"]);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn empty_page_with_cursor_continues_to_the_next() {
        let (stream, seen) = walk(vec![
            Ok(FakePage {
                results: vec![],
                has_more: true,
                next_token: Some("X".to_string()),
            }),
            Ok(FakePage {
                results: vec!["a"],
                has_more: false,
                next_token: None,
            }),
        ]);

        let items: Vec<_> = stream.try_collect().await.unwrap();
        assert_eq!(items, vec!["a"]);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[tokio::test]
    async fn a_failed_page_fetch_surfaces_after_earlier_items() {
        let (stream, _) = walk(vec![
            Ok(FakePage {
                results: vec!["a"],
                has_more: true,
                next_token: Some("X".to_string()),
            }),
            Err(Error::InvalidArgument("boom".to_string())),
        ]);

        futures::pin_mut!(stream);
        assert_eq!(stream.try_next().await.unwrap(), Some("a"));
        assert!(matches!(
            stream.try_next().await,
            Err(Error::InvalidArgument(_))
        ));
    }
}
