//! Cursor-based pagination over listing endpoints.
//!
//! A listing endpoint is driven through a fetch function taking an optional
//! continuation token and returning the raw page. The paginator wraps each page,
//! yields its items in server order, and asks for the next page only once the
//! current one is exhausted.
//!
//! A page continues the listing only when it says it is truncated *and* carries
//! a non-empty token. A truncated page without a token ends the listing with a
//! warning instead of looping on the first page forever.

use std::future::Future;

use futures::Stream;
use futures::stream;
use serde_json::Value;

use crate::error::CoreResult;
use crate::wrapper::{ResponseView, WrappingIter, wrap};

/// One page of a listing endpoint.
pub trait Page: ResponseView {
    /// Record type of the page's items.
    type Item: ResponseView;
    /// What the endpoint needs to resume: a marker, a page token, a start index...
    type Token: Clone + std::fmt::Debug;

    /// Whether the server reports more pages. Endpoints without a flag derive it
    /// from the presence of a token.
    fn is_truncated(&self) -> bool;

    /// Continuation token; `None` when absent or empty.
    fn next_token(&self) -> Option<Self::Token>;

    /// The page's items, wrapped lazily.
    fn into_items(self) -> WrappingIter<Self::Item, std::vec::IntoIter<Value>>;
}

/// The token to fetch the page after `page`, if there is one.
pub fn continuation<P: Page>(page: &P) -> Option<P::Token> {
    if !page.is_truncated() {
        return None;
    }
    let token = page.next_token();
    if token.is_none() {
        log::warn!(
            "{} is marked truncated but has no continuation token, stopping pagination",
            P::KIND
        );
    }
    token
}

enum Cursor<P: Page> {
    Fetch(Option<P::Token>),
    Page(P),
    Items {
        items: WrappingIter<P::Item, std::vec::IntoIter<Value>>,
        next: Option<P::Token>,
    },
    Done,
}

fn drive<P, F, Fut>(start: Cursor<P>, fetch: F) -> impl Stream<Item = CoreResult<P::Item>>
where
    P: Page,
    F: FnMut(Option<P::Token>) -> Fut,
    Fut: Future<Output = CoreResult<Value>>,
{
    stream::unfold((start, fetch), |(mut cursor, mut fetch)| async move {
        loop {
            cursor = match cursor {
                Cursor::Fetch(token) => {
                    log::debug!("Fetching {} (token: {token:?})", P::KIND);
                    match fetch(token).await.and_then(wrap::<P>) {
                        Ok(page) => Cursor::Page(page),
                        Err(e) => return Some((Err(e), (Cursor::Done, fetch))),
                    }
                }
                Cursor::Page(page) => {
                    let next = continuation(&page);
                    Cursor::Items {
                        items: page.into_items(),
                        next,
                    }
                }
                Cursor::Items { mut items, next } => match items.next() {
                    Some(item) => return Some((item, (Cursor::Items { items, next }, fetch))),
                    None => match next {
                        Some(token) => Cursor::Fetch(Some(token)),
                        None => Cursor::Done,
                    },
                },
                Cursor::Done => return None,
            };
        }
    })
}

/// Items of `first` and of every following page.
///
/// Item wrapping errors are yielded and the listing goes on. A fetch error
/// (or a page that cannot be wrapped) is yielded once and ends the stream.
pub fn paginate<P, F, Fut>(first: P, fetch: F) -> impl Stream<Item = CoreResult<P::Item>>
where
    P: Page,
    F: FnMut(Option<P::Token>) -> Fut,
    Fut: Future<Output = CoreResult<Value>>,
{
    drive(Cursor::<P>::Page(first), fetch)
}

/// Like [`paginate`], fetching the first page without a token.
pub fn paginate_from_start<P, F, Fut>(fetch: F) -> impl Stream<Item = CoreResult<P::Item>>
where
    P: Page,
    F: FnMut(Option<P::Token>) -> Fut,
    Fut: Future<Output = CoreResult<Value>>,
{
    drive(Cursor::<P>::Fetch(None), fetch)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::StreamExt;
    use serde_json::json;

    use super::*;
    use crate::error::CoreError;
    use crate::model::route53::{HostedZone, HostedZoneList};
    use crate::model::tagmanager::AccountList;
    use webapis_provider::ProviderError;

    /// Serves `pages` keyed by marker and records every marker asked for.
    fn zone_fetcher(
        pages: Vec<(Option<&'static str>, Value)>,
        calls: Rc<RefCell<Vec<Option<String>>>>,
    ) -> impl FnMut(Option<String>) -> std::future::Ready<CoreResult<Value>> {
        move |marker: Option<String>| {
            calls.borrow_mut().push(marker.clone());
            let page = pages
                .iter()
                .find(|(m, _)| m.map(str::to_string) == marker)
                .map(|(_, p)| p.clone());
            std::future::ready(page.ok_or_else(|| {
                CoreError::Provider(ProviderError::NetworkError {
                    provider: "test".into(),
                    detail: format!("no page for {marker:?}"),
                })
            }))
        }
    }

    fn zone(id: &str) -> Value {
        json!({"Id": format!("/hostedzone/{id}"), "Name": format!("{id}.com.")})
    }

    async fn names(stream: impl Stream<Item = CoreResult<HostedZone>>) -> Vec<String> {
        stream
            .map(|z| z.map_or_else(|e| format!("ERR {e}"), |z| z.name))
            .collect()
            .await
    }

    #[tokio::test]
    async fn pages_are_concatenated_in_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let fetch = zone_fetcher(
            vec![
                (
                    None,
                    json!({"HostedZones": [zone("a"), zone("b")], "IsTruncated": true, "NextMarker": "m1"}),
                ),
                (
                    Some("m1"),
                    json!({"HostedZones": [], "IsTruncated": true, "NextMarker": "m2"}),
                ),
                (
                    Some("m2"),
                    json!({"HostedZones": [zone("c")], "IsTruncated": false}),
                ),
            ],
            Rc::clone(&calls),
        );

        let got = names(paginate_from_start::<HostedZoneList, _, _>(fetch)).await;
        assert_eq!(got, vec!["a.com.", "b.com.", "c.com."]);
        // n truncated pages: n + 1 fetches
        assert_eq!(
            *calls.borrow(),
            vec![None, Some("m1".to_string()), Some("m2".to_string())]
        );
    }

    #[tokio::test]
    async fn untruncated_first_page_stops_despite_stray_token() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let fetch = zone_fetcher(vec![], Rc::clone(&calls));
        let first: HostedZoneList = wrap(json!({
            "HostedZones": [zone("a")],
            "IsTruncated": false,
            "NextMarker": "stray"
        }))
        .unwrap();

        let got = names(paginate(first, fetch)).await;
        assert_eq!(got, vec!["a.com."]);
        assert!(calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn truncated_page_without_token_ends_listing() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let fetch = zone_fetcher(
            vec![(
                None,
                json!({"HostedZones": [zone("a")], "IsTruncated": true, "NextMarker": ""}),
            )],
            Rc::clone(&calls),
        );

        let got = names(paginate_from_start::<HostedZoneList, _, _>(fetch)).await;
        assert_eq!(got, vec!["a.com."]);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_yielded_once_and_ends_stream() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let fetch = zone_fetcher(
            vec![(
                None,
                json!({"HostedZones": [zone("a")], "IsTruncated": true, "NextMarker": "gone"}),
            )],
            Rc::clone(&calls),
        );

        let got: Vec<_> = paginate_from_start::<HostedZoneList, _, _>(fetch)
            .collect()
            .await;
        assert_eq!(got.len(), 2);
        assert!(got[0].is_ok());
        assert!(matches!(got[1], Err(CoreError::Provider(_))));
        assert_eq!(calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn malformed_item_does_not_stop_listing() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let fetch = zone_fetcher(
            vec![
                (
                    None,
                    json!({"HostedZones": [{"Name": "no-id.com."}], "IsTruncated": true, "NextMarker": "m1"}),
                ),
                (Some("m1"), json!({"HostedZones": [zone("b")]})),
            ],
            Rc::clone(&calls),
        );

        let got: Vec<_> = paginate_from_start::<HostedZoneList, _, _>(fetch)
            .collect()
            .await;
        assert_eq!(got.len(), 2);
        assert!(matches!(got[0], Err(CoreError::MalformedRecord { .. })));
        assert_eq!(got[1].as_ref().unwrap().name, "b.com.");
    }

    #[tokio::test]
    async fn token_alone_signals_more_pages() {
        let fetch = |token: Option<String>| {
            let page = match token.as_deref() {
                None => json!({"account": [{"accountId": "1", "name": "A"}], "nextPageToken": "p2"}),
                _ => json!({"account": [{"accountId": "2", "name": "B"}]}),
            };
            std::future::ready(Ok(page))
        };

        let ids: Vec<String> = paginate_from_start::<AccountList, _, _>(fetch)
            .map(|a| a.unwrap().account_id)
            .collect()
            .await;
        assert_eq!(ids, vec!["1", "2"]);
    }
}
