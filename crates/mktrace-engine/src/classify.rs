use std::sync::LazyLock;

use regex::Regex;

/// Driver names recognized as C compilers.
const C_COMPILERS: &[&str] = &["cc", "gcc", "egcc", "tcc", "emcc", "clang"];

/// Driver names recognized as C++ compilers.
const CPP_COMPILERS: &[&str] = &["c++", "g++", "clang++", "em++"];

static DIRECTORY_NOTICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:g?make)(?:\[\d+\])?: (Entering|Leaving) directory ['"]([^'"]+)['"]"#)
        .unwrap()
});

/// What a single trace line was recognized as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    DirectoryNotice(DirectoryNotice),
    CompilerInvocation(CompilerFamily),
    Other,
}

/// A build tool announcement that it changed its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNotice {
    pub action: DirectoryAction,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryAction {
    Enter,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFamily {
    C,
    Cpp,
}

/// Decides what a trace line is, looking only at the notice grammar and
/// the line's first whitespace-delimited token.
pub fn classify_line(line: &str) -> LineKind {
    if let Some(captures) = DIRECTORY_NOTICE.captures(line) {
        let action = match &captures[1] {
            "Entering" => DirectoryAction::Enter,
            _ => DirectoryAction::Leave,
        };
        return LineKind::DirectoryNotice(DirectoryNotice {
            action,
            path: captures[2].to_string(),
        });
    }

    let Some(first) = line.split_whitespace().next() else {
        return LineKind::Other;
    };
    match compiler_family(first) {
        Some(family) => LineKind::CompilerInvocation(family),
        None => LineKind::Other,
    }
}

/// Recognizes `token` as a compiler driver. The token may carry a
/// leading directory path, a cross-compile target prefix, and a dotted
/// version suffix; the remaining name must equal one of the known
/// driver names exactly.
pub fn compiler_family(token: &str) -> Option<CompilerFamily> {
    let basename = token.rsplit('/').next().unwrap_or(token);
    let name = strip_version_suffix(basename);
    if matches_family(name, C_COMPILERS) {
        Some(CompilerFamily::C)
    } else if matches_family(name, CPP_COMPILERS) {
        Some(CompilerFamily::Cpp)
    } else {
        None
    }
}

fn matches_family(name: &str, family: &[&str]) -> bool {
    family.iter().any(|driver| {
        name == *driver
            || name
                .strip_suffix(driver)
                .is_some_and(|prefix| prefix.ends_with('-'))
    })
}

/// Strips a trailing `-12` or `-12.3.0` style version marker.
fn strip_version_suffix(name: &str) -> &str {
    match name.rsplit_once('-') {
        Some((stem, suffix))
            if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit() || c == '.') =>
        {
            stem
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_compiler_invocations() {
        for name in ["cc", "gcc", "egcc", "tcc", "emcc", "clang"] {
            let line = format!("{} -c main.c", name);
            assert_eq!(
                classify_line(&line),
                LineKind::CompilerInvocation(CompilerFamily::C),
                "expected {} to be recognized as a C compiler",
                name
            );
        }
    }

    #[test]
    fn test_cpp_compiler_invocations() {
        for name in ["c++", "g++", "clang++", "em++"] {
            let line = format!("{} -c main.cpp", name);
            assert_eq!(
                classify_line(&line),
                LineKind::CompilerInvocation(CompilerFamily::Cpp),
                "expected {} to be recognized as a C++ compiler",
                name
            );
        }
    }

    #[test]
    fn test_versioned_drivers() {
        assert_eq!(compiler_family("gcc-12"), Some(CompilerFamily::C));
        assert_eq!(compiler_family("clang-15.0.1"), Some(CompilerFamily::C));
        assert_eq!(compiler_family("g++-13"), Some(CompilerFamily::Cpp));
        assert_eq!(compiler_family("clang++-17"), Some(CompilerFamily::Cpp));
    }

    #[test]
    fn test_cross_prefixed_drivers() {
        assert_eq!(
            compiler_family("arm-linux-gnueabi-gcc"),
            Some(CompilerFamily::C)
        );
        assert_eq!(
            compiler_family("x86_64-w64-mingw32-clang++"),
            Some(CompilerFamily::Cpp)
        );
        assert_eq!(
            compiler_family("powerpc64-linux-musl-cc"),
            Some(CompilerFamily::C)
        );
    }

    #[test]
    fn test_path_prefixed_drivers() {
        assert_eq!(compiler_family("/usr/bin/gcc"), Some(CompilerFamily::C));
        assert_eq!(
            compiler_family("/opt/llvm/bin/clang++-17"),
            Some(CompilerFamily::Cpp)
        );
    }

    #[test]
    fn test_non_compiler_tokens() {
        assert_eq!(compiler_family("ld"), None);
        assert_eq!(compiler_family("ar"), None);
        assert_eq!(compiler_family("ccache"), None);
        assert_eq!(compiler_family("clang-tidy"), None);
        assert_eq!(compiler_family("gcc-ar"), None);
        assert_eq!(compiler_family("makeinfo"), None);
    }

    #[test]
    fn test_non_compiler_lines() {
        assert_eq!(classify_line("ld -o prog main.o util.o"), LineKind::Other);
        assert_eq!(classify_line("rm -f *.o"), LineKind::Other);
        assert_eq!(classify_line(""), LineKind::Other);
        assert_eq!(classify_line("   "), LineKind::Other);
    }

    #[test]
    fn test_directory_enter_notice() {
        let kind = classify_line("make: Entering directory '/home/user/project'");
        assert_eq!(
            kind,
            LineKind::DirectoryNotice(DirectoryNotice {
                action: DirectoryAction::Enter,
                path: "/home/user/project".to_string(),
            })
        );
    }

    #[test]
    fn test_directory_leave_notice_double_quoted() {
        let kind = classify_line(r#"gmake: Leaving directory "/tmp/build""#);
        assert_eq!(
            kind,
            LineKind::DirectoryNotice(DirectoryNotice {
                action: DirectoryAction::Leave,
                path: "/tmp/build".to_string(),
            })
        );
    }

    #[test]
    fn test_directory_notice_with_level_marker() {
        let kind = classify_line("make[2]: Entering directory '/src/lib'");
        assert_eq!(
            kind,
            LineKind::DirectoryNotice(DirectoryNotice {
                action: DirectoryAction::Enter,
                path: "/src/lib".to_string(),
            })
        );
    }

    #[test]
    fn test_other_make_chatter_is_not_a_notice() {
        assert_eq!(
            classify_line("make: Nothing to be done for 'all'."),
            LineKind::Other
        );
        assert_eq!(classify_line("make: Entering directory"), LineKind::Other);
        assert_eq!(
            classify_line("remake: Entering directory '/x'"),
            LineKind::Other
        );
    }
}
