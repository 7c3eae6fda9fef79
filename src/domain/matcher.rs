use anyhow::{Context, Result};
use regex::Regex;
use strsim::normalized_levenshtein;

use crate::domain::search::MatchOccurrence;

/// 匹配位置前后各取多少个字符作为上下文
const CONTEXT_CHARS: usize = 50;

/// 计算两个字符串的相似度 (0-100, 不区分大小写)
///
/// 100 表示完全相同, 编辑距离越大得分越低;
/// 空字符串与非空字符串的得分为 0
pub fn similarity_ratio(a: &str, b: &str) -> u8 {
    let score = normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase());
    (score * 100.0).round() as u8
}

/// 判断文本中是否有任意一个按空白切分的词与关键词足够相似
///
/// 空文本返回 false; 找到第一个达标的词即返回
pub fn is_fuzzy_present(text: &str, keyword: &str, threshold: u8) -> bool {
    text.split_whitespace()
        .any(|word| similarity_ratio(word, keyword) >= threshold)
}

/// 模糊匹配器, 持有阈值和分词正则
pub struct FuzzyMatcher {
    threshold: u8,
    word_pattern: Regex,
}

impl FuzzyMatcher {
    /// 创建模糊匹配器
    pub fn new(threshold: u8) -> Result<Self> {
        // 匹配连续的单词字符 (字母数字和下划线),
        // 与判定用的空白切分是两套独立的分词方式
        let word_pattern = Regex::new(r"\w+").context("无法创建分词正则")?;

        Ok(Self {
            threshold,
            word_pattern,
        })
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// 判断关键词是否在文本中模糊出现
    pub fn is_present(&self, text: &str, keyword: &str) -> bool {
        is_fuzzy_present(text, keyword, self.threshold)
    }

    /// 列出搜索区域内关键词的全部匹配位置
    ///
    /// 注意: 这里按单词字符分词, 与 is_present 的空白切分可能不一致;
    /// 带标点的词可能通过判定却在这里列不出匹配, 这是沿袭的既有行为
    pub fn occurrences(&self, region: &str, keyword: &str) -> Vec<MatchOccurrence> {
        let mut found = Vec::new();

        for word_match in self.word_pattern.find_iter(region) {
            if similarity_ratio(word_match.as_str(), keyword) >= self.threshold {
                found.push(MatchOccurrence {
                    keyword: keyword.to_string(),
                    matched_word: word_match.as_str().to_string(),
                    position: word_match.start(),
                    context: context_window(region, word_match.start(), word_match.end())
                        .to_string(),
                });
            }
        }

        found
    }
}

/// 截取匹配位置前后各 50 个字符, 在区域边界处截断
fn context_window(region: &str, start: usize, end: usize) -> &str {
    let context_start = region[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let context_end = region[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map(|(idx, _)| end + idx)
        .unwrap_or(region.len());

    &region[context_start..context_end]
}
