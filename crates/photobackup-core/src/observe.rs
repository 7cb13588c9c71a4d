//! Observable values modelled as boxed streams.
//!
//! Repositories and managers expose their changing values as
//! [`Observable`]s: streams that yield the current value first and then a
//! fresh value after every change. Consumers combine them without knowing
//! whether a value comes from a database query or an in-memory signal.

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;

use crate::result::AppResult;

/// A stream of values that starts with the current value.
pub type Observable<T> = BoxStream<'static, T>;

/// An observable whose every emission is the result of a fallible query.
pub type QueryObservable<T> = Observable<AppResult<T>>;

/// Turn a watch receiver into an [`Observable`].
///
/// The first item is the value current at subscription time. The stream
/// ends when the sender is dropped. Intermediate values may be skipped if
/// the sender updates faster than the consumer polls; the latest value is
/// always delivered.
pub fn from_watch<T>(rx: watch::Receiver<T>) -> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    futures::stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let value = rx.borrow_and_update().clone();
        Some((value, (rx, false)))
    })
    .boxed()
}

/// Drop consecutive duplicates from an observable.
pub fn distinct<T>(stream: Observable<T>) -> Observable<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    stream
        .scan(None::<T>, |last, value| {
            let emit = last.as_ref() != Some(&value);
            if emit {
                *last = Some(value.clone());
            }
            futures::future::ready(Some(emit.then_some(value)))
        })
        .filter_map(futures::future::ready)
        .boxed()
}
