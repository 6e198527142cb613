/// Lazy iterator over a path and its ancestors
///
/// For `/blog/posts/hello-world`, yields:
/// `/blog/posts/hello-world` → `/blog/posts` → `/blog` → `/`
///
/// Borrows from the input, so walking the hierarchy never allocates. The
/// resolver uses it to find the most specific registered prefix: the first
/// hit while walking upward is the one with the most matching segments.
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::path::PathHierarchy;
///
/// let paths: Vec<&str> = PathHierarchy::new("/blog/posts").collect();
/// assert_eq!(paths, vec!["/blog/posts", "/blog", "/"]);
///
/// let ancestors: Vec<&str> = PathHierarchy::ancestors_of("/blog/posts").collect();
/// assert_eq!(ancestors, vec!["/blog", "/"]);
/// ```
#[derive(Debug, Clone)]
pub struct PathHierarchy<'a> {
    current: Option<&'a str>,
}

impl<'a> PathHierarchy<'a> {
    /// Starts at `path` itself
    pub fn new(path: &'a str) -> Self {
        Self {
            current: Some(path),
        }
    }

    /// Starts at the parent of `path` (empty for the root)
    pub fn ancestors_of(path: &'a str) -> Self {
        let mut hierarchy = Self::new(path);
        hierarchy.next();
        hierarchy
    }

    fn parent(path: &str) -> Option<&str> {
        match path.rfind('/') {
            _ if path == "/" => None,
            Some(0) => Some("/"),
            Some(slash_pos) => Some(&path[..slash_pos]),
            None => None,
        }
    }
}

impl<'a> Iterator for PathHierarchy<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = Self::parent(current);
        Some(current)
    }
}
