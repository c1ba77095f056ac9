use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Longest n-gram emitted by [`tokenize`]: unigrams through trigrams.
pub const MAX_NGRAM: usize = 3;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Extract the lowercased, NFKC-normalized word stream with stop-words removed.
fn words(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|t| !is_stopword(t))
        .map(str::to_string)
        .collect()
}

/// Tokenize text into space-joined n-grams of length 1..=[`MAX_NGRAM`].
///
/// Stop-words are removed before n-gram expansion, so a trigram spans three
/// consecutive surviving words, not three consecutive input words.
pub fn tokenize(text: &str) -> Vec<String> {
    let ws = words(text);
    let mut terms = Vec::with_capacity(ws.len() * MAX_NGRAM);
    for n in 1..=MAX_NGRAM {
        if ws.len() < n {
            break;
        }
        for window in ws.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Cell biology research");
        assert!(t.iter().any(|w| w == "cell"));
        assert!(t.iter().any(|w| w == "cell biology"));
        assert!(t.iter().any(|w| w == "cell biology research"));
    }

    #[test]
    fn filters_stopwords_before_ngrams() {
        let t = tokenize("the cell and the biology");
        assert!(!t.iter().any(|w| w.contains("the")));
        // "and"/"the" removed, so the surviving words form one bigram
        assert!(t.iter().any(|w| w == "cell biology"));
    }

    #[test]
    fn normalizes_unicode() {
        let t = tokenize("Café");
        assert!(t.iter().any(|w| w == "café" || w == "cafe"));
    }

    #[test]
    fn empty_text_yields_no_terms() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("the and of").is_empty());
    }
}
