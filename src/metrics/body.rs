//! Response body wrapper that counts the bytes actually streamed.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes, HttpBody};
use http_body::{Frame, SizeHint};

type OnComplete = Box<dyn FnOnce(u64) + Send + 'static>;

/// Passes frames of `inner` through unchanged and reports the total data
/// length once, when the stream ends or the body is dropped early.
pub(crate) struct CountingBody {
    inner: Body,
    counted: u64,
    on_complete: Option<OnComplete>,
}

impl CountingBody {
    pub(crate) fn new(inner: Body, on_complete: impl FnOnce(u64) + Send + 'static) -> Self {
        CountingBody {
            inner,
            counted: 0,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    fn complete(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(self.counted);
        }
    }
}

impl HttpBody for CountingBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.counted += data.len() as u64;
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(None) => {
                this.complete();
                Poll::Ready(None)
            }
            other => other,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for CountingBody {
    fn drop(&mut self) {
        self.complete();
    }
}
