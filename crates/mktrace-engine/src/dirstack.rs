use mktrace_types::{Error, Result};

/// Working-directory frames announced by the build tool during a scan.
/// The scan's base directory forms the bottom frame and is never popped.
#[derive(Debug)]
pub struct DirectoryStack {
    frames: Vec<String>,
}

impl DirectoryStack {
    pub fn new(base: String) -> Self {
        Self { frames: vec![base] }
    }

    /// Pushes a newly entered directory on top of the stack.
    pub fn enter(&mut self, path: String) {
        self.frames.push(path);
    }

    /// Pops the most recent frame. Reports underflow and keeps the stack
    /// unchanged when only the base frame remains.
    pub fn leave(&mut self) -> Result<()> {
        if self.frames.len() == 1 {
            return Err(Error::StackUnderflow);
        }
        self.frames.pop();
        Ok(())
    }

    /// The directory compile entries are currently attributed to.
    pub fn current(&self) -> &str {
        // frames always holds at least the base directory
        self.frames.last().map(String::as_str).unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_starts_at_base() {
        let stack = DirectoryStack::new("/base".to_string());
        assert_eq!(stack.current(), "/base");
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_enter_and_leave_restore_base() {
        let mut stack = DirectoryStack::new("/base".to_string());
        stack.enter("/base/sub".to_string());
        stack.enter("/base/sub/deeper".to_string());
        assert_eq!(stack.current(), "/base/sub/deeper");
        assert_eq!(stack.depth(), 3);

        stack.leave().unwrap();
        assert_eq!(stack.current(), "/base/sub");
        stack.leave().unwrap();
        assert_eq!(stack.current(), "/base");
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_leave_on_base_frame_underflows() {
        let mut stack = DirectoryStack::new("/base".to_string());
        let err = stack.leave().unwrap_err();
        assert!(matches!(err, Error::StackUnderflow));
        assert_eq!(stack.current(), "/base");
        assert_eq!(stack.depth(), 1);
    }
}
