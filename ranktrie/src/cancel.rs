//! 世代カウンタによる協調的キャンセル
//!
//! [`CancelSource`]が世代を進めると、それ以前に発行された[`CancelToken`]は
//! すべてキャンセル済みになります。検索はループの各ステップでトークンを確認します。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::errors::{RankTrieError, Result};

/// キャンセルトークンの発行元
#[derive(Clone, Debug, Default)]
pub struct CancelSource {
    generation: Arc<AtomicU64>,
}

impl CancelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 世代を進めて、以前のトークンをすべてキャンセルし、新しい世代のトークンを返します。
    pub fn renew(&self) -> CancelToken {
        let issued = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        CancelToken {
            generation: Some(Arc::clone(&self.generation)),
            issued,
        }
    }

    /// 発行済みのトークンをすべてキャンセルします。
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// 現在の世代
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// 検索に渡されるキャンセルトークン
#[derive(Clone, Debug)]
pub struct CancelToken {
    generation: Option<Arc<AtomicU64>>,
    issued: u64,
}

impl CancelToken {
    /// キャンセルされることのないトークンを返します。
    pub const fn never() -> Self {
        Self {
            generation: None,
            issued: 0,
        }
    }

    /// 発行元の世代が進んでいればキャンセル済みです。
    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.generation
            .as_ref()
            .is_some_and(|g| g.load(Ordering::Acquire) != self.issued)
    }

    /// キャンセル済みであれば[`RankTrieError::Cancelled`]を返します。
    #[inline(always)]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(RankTrieError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::never()
    }
}
