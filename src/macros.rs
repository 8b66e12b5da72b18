/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// The pattern is a literal checked by the test suite, so a failure to
/// compile is a programming error rather than a runtime condition.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("invalid regex literal"));
        &*RE
    }};
}
