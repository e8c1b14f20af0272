/// Leading determiners and quantifiers stripped from the front of a noun chunk
/// before it becomes an aspect candidate.
pub(crate) const LEADING_STOPWORDS: [&str; 17] = [
    "the", "a", "an", "my", "our", "your", "their", "this", "that", "these", "those", "some",
    "any", "all", "few", "many", "several",
];

/// Generic or sentiment-bearing words that never qualify as aspects. A candidate
/// is rejected when its normalized form exactly matches an entry.
pub(crate) const ASPECT_BLACKLIST: [&str; 41] = [
    // sentiment adjectives
    "good",
    "bad",
    "great",
    "terrible",
    "awful",
    "horrible",
    "nice",
    "amazing",
    "excellent",
    "poor",
    "best",
    "worst",
    "slow",
    "fast",
    "cheap",
    // filler nouns
    "thing",
    "stuff",
    "way",
    "lot",
    "bit",
    "bunch",
    "plenty",
    "time",
    "minute",
    "hour",
    "day",
    "year",
    "moment",
    "part",
    "side",
    "kind",
    "sort",
    "type",
    "one",
    "something",
    "anything",
    "everything",
    "nothing",
    "example",
    "reason",
    "issue",
];
