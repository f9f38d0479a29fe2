//! `filter`：候选后处理（去重/裁剪）。

use std::collections::HashSet;

use crate::model::Candidate;

/// Filter：对候选列表做后处理。
pub trait Filter: Send + Sync {
    fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate>;
}

/// 默认 filter：按 text 去重（保留首次出现的位置与来源），截断到 limit。
pub struct DedupTruncate {
    pub limit: usize,
}

impl Filter for DedupTruncate {
    fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut seen: HashSet<String> = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| seen.insert(c.text.clone()))
            .take(self.limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CandidateSource;

    #[test]
    fn keeps_first_occurrence_in_order() {
        let input = vec![
            Candidate::new("你好", CandidateSource::Sentence),
            Candidate::new("你", CandidateSource::Exact),
            Candidate::new("你好", CandidateSource::Exact),
            Candidate::new("尼", CandidateSource::Prefix),
            Candidate::new("你", CandidateSource::Prefix),
        ];
        let out = DedupTruncate { limit: 10 }.apply(input);
        let texts: Vec<&str> = out.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["你好", "你", "尼"]);
        assert_eq!(out[0].source, CandidateSource::Sentence);
    }

    #[test]
    fn truncates_after_dedup() {
        let input = ["a", "a", "b", "c", "d"]
            .into_iter()
            .map(|t| Candidate::new(t, CandidateSource::Exact))
            .collect();
        let out = DedupTruncate { limit: 3 }.apply(input);
        let texts: Vec<&str> = out.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
