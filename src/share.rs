/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Sharing an article link: the platform share sheet when there is one,
//! otherwise the clipboard, otherwise the link is shown for manual copying.

use log::{info, warn};
use url::Url;

use crate::error::ShareError;
use crate::notifications::Messages;
use crate::parser::ArticleLinker;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: Url,
}

impl ShareRequest {
    pub fn for_article(
        article_id: &str,
        title: Option<&str>,
        linker: &ArticleLinker,
        messages: &Messages,
    ) -> Self {
        let title = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(messages.unknown_article);
        Self {
            title: title.to_owned(),
            text: messages.share_text.to_owned(),
            url: linker.article_url(article_id),
        }
    }
}

/// A platform share sheet (the Web Share API in a browser).
pub trait NativeShare {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError>;
}

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

#[derive(Debug)]
pub enum ShareOutcome {
    /// Handed to the share sheet. Its result is final, there is no fallback.
    Native(Result<(), ShareError>),
    Copied,
    /// Nothing could take the link; show it to the user.
    ManualCopy(Url),
}

impl ShareOutcome {
    /// Text to show the user, if any.
    pub fn message(&self, messages: &Messages) -> Option<String> {
        match self {
            ShareOutcome::Native(_) => None,
            ShareOutcome::Copied => Some(messages.link_copied.to_owned()),
            ShareOutcome::ManualCopy(url) => Some(format!("{}\n{url}", messages.copy_link_prompt)),
        }
    }
}

#[derive(Default)]
pub struct Sharer {
    native: Option<Box<dyn NativeShare>>,
    clipboard: Option<Box<dyn ClipboardWriter>>,
}

impl Sharer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native(mut self, native: impl NativeShare + 'static) -> Self {
        self.native = Some(Box::new(native));
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardWriter + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn share(&mut self, request: &ShareRequest) -> ShareOutcome {
        if let Some(native) = self.native.as_mut() {
            let result = native.share(request);
            match &result {
                Ok(()) => info!("Shared {}", request.url),
                Err(err) => info!("Share of {} failed: {err}", request.url),
            }
            return ShareOutcome::Native(result);
        }

        let Some(clipboard) = self.clipboard.as_mut() else {
            return ShareOutcome::ManualCopy(request.url.clone());
        };
        match clipboard.write_text(request.url.as_str()) {
            Ok(()) => ShareOutcome::Copied,
            Err(err) => {
                warn!("Could not copy article link: {err}");
                ShareOutcome::ManualCopy(request.url.clone())
            },
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub struct SystemClipboard {
    clipboard: arboard::Clipboard,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClipboard {
    pub fn new() -> Result<Self, ShareError> {
        let clipboard =
            arboard::Clipboard::new().map_err(|err| ShareError::Clipboard(err.to_string()))?;
        Ok(Self { clipboard })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        self.clipboard
            .set_text(text)
            .map_err(|err| ShareError::Clipboard(err.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    pub(crate) struct RecordingClipboard {
        pub(crate) texts: Rc<RefCell<Vec<String>>>,
        pub(crate) broken: bool,
    }

    impl ClipboardWriter for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
            if self.broken {
                return Err(ShareError::Clipboard("denied".into()));
            }
            self.texts.borrow_mut().push(text.to_owned());
            Ok(())
        }
    }

    struct RejectingShare;

    impl NativeShare for RejectingShare {
        fn share(&mut self, _request: &ShareRequest) -> Result<(), ShareError> {
            Err(ShareError::Rejected("AbortError".into()))
        }
    }

    fn request() -> ShareRequest {
        let linker = ArticleLinker::new("https://blog.example.com").unwrap();
        ShareRequest::for_article("a1", Some(" Title "), &linker, &Messages::ZH)
    }

    #[test]
    fn request_for_article() {
        let request = request();
        assert_eq!(request.title, "Title");
        assert_eq!(request.text, "阅读这篇来自飞书博客的文章");
        assert_eq!(request.url.as_str(), "https://blog.example.com/article/a1");
    }

    #[test]
    fn native_share_has_no_fallback() {
        let clipboard = RecordingClipboard::default();
        let mut sharer = Sharer::new()
            .with_native(RejectingShare)
            .with_clipboard(clipboard.clone());

        let outcome = sharer.share(&request());
        assert!(matches!(outcome, ShareOutcome::Native(Err(ShareError::Rejected(_)))));
        assert!(clipboard.texts.borrow().is_empty());
        assert_eq!(outcome.message(&Messages::ZH), None);
    }

    #[test]
    fn clipboard_then_manual_copy() {
        let clipboard = RecordingClipboard::default();
        let mut sharer = Sharer::new().with_clipboard(clipboard.clone());
        let outcome = sharer.share(&request());
        assert!(matches!(outcome, ShareOutcome::Copied));
        assert_eq!(*clipboard.texts.borrow(), ["https://blog.example.com/article/a1"]);
        assert_eq!(
            outcome.message(&Messages::ZH).as_deref(),
            Some("文章链接已复制到剪贴板")
        );

        let mut sharer = Sharer::new().with_clipboard(RecordingClipboard {
            broken: true,
            ..Default::default()
        });
        let outcome = sharer.share(&request());
        assert!(matches!(&outcome, ShareOutcome::ManualCopy(url) if url.as_str() == "https://blog.example.com/article/a1"));
        assert_eq!(
            outcome.message(&Messages::ZH).as_deref(),
            Some("复制以下链接分享：\nhttps://blog.example.com/article/a1")
        );

        assert!(matches!(Sharer::new().share(&request()), ShareOutcome::ManualCopy(_)));
    }
}
