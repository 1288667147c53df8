//! The fixed C program every candidate is embedded into.
//!
//! Candidates land in the body of `main`, after the standard C headers and
//! the common POSIX ones.

/// Everything before the candidate.
pub const C_TEMPLATE_PREFIX: &str = r#"
#include <stdio.h>
#include <stdlib.h>
#include <string.h>
#include <math.h>
#include <ctype.h>
#include <time.h>
#include <assert.h>
#include <errno.h>
#include <float.h>
#include <limits.h>
#include <locale.h>
#include <setjmp.h>
#include <signal.h>
#include <stdarg.h>
#include <stddef.h>
#include <unistd.h>
#include <fcntl.h>
#include <sys/types.h>
#include <sys/stat.h>
#include <pthread.h>
#include <dirent.h>
#include <termios.h>

int main(int argc, char **argv) {
"#;

/// Everything after the candidate.
pub const C_TEMPLATE_SUFFIX: &str = r#"
    return 0;
}
"#;

/// Embed a candidate into the program template.
///
/// The candidate is inserted verbatim; no escaping is applied.
pub fn embed(candidate: &str) -> String {
    let mut source =
        String::with_capacity(C_TEMPLATE_PREFIX.len() + candidate.len() + C_TEMPLATE_SUFFIX.len());
    source.push_str(C_TEMPLATE_PREFIX);
    source.push_str(candidate);
    source.push_str(C_TEMPLATE_SUFFIX);
    source
}

/// Recover the candidate from a source produced by [`embed`].
///
/// Returns `None` if the text is not a templated program.
pub fn extract(source: &str) -> Option<&str> {
    source
        .strip_prefix(C_TEMPLATE_PREFIX)?
        .strip_suffix(C_TEMPLATE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_places_candidate_in_main() {
        let source = embed("x++;");
        assert!(source.contains("int main(int argc, char **argv) {\nx++;\n    return 0;\n}"));
        assert!(source.starts_with("\n#include <stdio.h>"));
    }

    #[test]
    fn test_embed_is_verbatim() {
        let candidate = "%s\"\\{";
        assert_eq!(extract(&embed(candidate)), Some(candidate));
    }

    #[test]
    fn test_empty_candidate() {
        let source = embed("");
        assert_eq!(source.len(), C_TEMPLATE_PREFIX.len() + C_TEMPLATE_SUFFIX.len());
    }

    #[test]
    fn test_extract_rejects_foreign_text() {
        assert_eq!(extract("int main() { return 0; }"), None);
    }
}
