//! Ordered task results

use std::fmt;
use std::ops::Index;

/// Results of one coordinator run, one per task, in task-creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    values: Vec<String>,
}

impl ResultSet {
    pub(crate) fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<String> {
        self.values
    }
}

impl Index<usize> for ResultSet {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.values[index]
    }
}

impl IntoIterator for ResultSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_as_list() {
        let results = ResultSet::new(vec!["task1 data".to_string(), "task2 data".to_string()]);
        assert_eq!(results.to_string(), r#"["task1 data", "task2 data"]"#);
    }

    #[test]
    fn test_access() {
        let results = ResultSet::new(vec!["a data".to_string(), "b data".to_string()]);

        assert_eq!(results.len(), 2);
        assert_eq!(&results[1], "b data");
        assert_eq!(results.get(0), Some("a data"));
        assert_eq!(results.get(2), None);
        assert_eq!(results.iter().count(), 2);
        assert_eq!(results.into_vec(), vec!["a data", "b data"]);
    }
}
