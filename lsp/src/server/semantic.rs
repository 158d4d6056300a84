use tower_lsp::lsp_types::{SemanticToken, SemanticTokensEdit};

// Each token occupies five integers in the wire array that edits index into.
const INTS_PER_TOKEN: usize = 5;

/// `(common prefix, common suffix, deleted tokens)` between two token sets.
pub(crate) fn common_prefix_suffix_delete_count(old: &[SemanticToken], new: &[SemanticToken]) -> (usize, usize, usize) {
    let mut cp = 0usize;
    let min_len = old.len().min(new.len());
    while cp < min_len && old[cp] == new[cp] {
        cp += 1;
    }

    if cp == old.len() && old.len() == new.len() {
        return (cp, 0, 0);
    }

    let mut cs = 0usize;
    while cs < (old.len() - cp) && cs < (new.len() - cp) && old[old.len() - 1 - cs] == new[new.len() - 1 - cs] {
        cs += 1;
    }
    let delete_count = old.len().saturating_sub(cp + cs);
    (cp, cs, delete_count)
}

/// At most one edit replacing the changed middle of `old` with that of `new`.
pub(crate) fn compute_delta_edits(old: &[SemanticToken], new: &[SemanticToken]) -> Vec<SemanticTokensEdit> {
    let (cp, cs, delete_count) = common_prefix_suffix_delete_count(old, new);
    let insert = &new[cp..new.len() - cs];
    if delete_count == 0 && insert.is_empty() {
        return Vec::new();
    }
    vec![SemanticTokensEdit {
        start: (cp * INTS_PER_TOKEN) as u32,
        delete_count: (delete_count * INTS_PER_TOKEN) as u32,
        data: (!insert.is_empty()).then(|| insert.to_vec()),
    }]
}
