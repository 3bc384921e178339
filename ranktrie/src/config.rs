//! 検索の設定
//!
//! 候補検索の上限値をまとめた[`SearchConfig`]を定義します。

/// 既定の最大編集距離
pub const DEFAULT_MAX_DISTANCE: u32 = 2;

/// 既定のノード訪問数の上限
pub const DEFAULT_MAX_VISITED_NODES: usize = 2000;

/// 候補を出す最小のクエリ長
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// 既定の候補数
pub const DEFAULT_LIMIT: usize = 7;

/// 既定の接頭辞キャッシュ容量
pub const DEFAULT_PREFIX_CACHE_CAPACITY: usize = 10_000;

/// 候補検索の設定
///
/// # 例
///
/// ```
/// use ranktrie::SearchConfig;
///
/// let config = SearchConfig::new().max_distance(1).max_visited_nodes(500);
/// assert_eq!(config.max_distance, 1);
/// assert_eq!(config.default_limit, 7);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchConfig {
    /// あいまい検索で許す最大編集距離
    pub max_distance: u32,

    /// 接頭辞検索で展開するノード数の上限
    ///
    /// 空文字列のような病的な接頭辞に対する最悪の処理量を抑えます。
    /// 上限に達した場合、結果は不完全になります。
    pub max_visited_nodes: usize,

    /// これより短いクエリには候補を出しません
    pub min_query_len: usize,

    /// 候補数の既定値
    pub default_limit: usize,

    /// セッションごとの接頭辞キャッシュの容量
    pub prefix_cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfig {
    /// 既定値で設定を作成します。
    pub const fn new() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            max_visited_nodes: DEFAULT_MAX_VISITED_NODES,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            default_limit: DEFAULT_LIMIT,
            prefix_cache_capacity: DEFAULT_PREFIX_CACHE_CAPACITY,
        }
    }

    pub const fn max_distance(mut self, max_distance: u32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub const fn max_visited_nodes(mut self, max_visited_nodes: usize) -> Self {
        self.max_visited_nodes = max_visited_nodes;
        self
    }

    pub const fn min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    pub const fn default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub const fn prefix_cache_capacity(mut self, prefix_cache_capacity: usize) -> Self {
        self.prefix_cache_capacity = prefix_cache_capacity;
        self
    }
}
