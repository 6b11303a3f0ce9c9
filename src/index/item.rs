use super::TestMethod;

/// A single test together with the file that declares it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestItem {
    pub path: String,
    pub class_path: String,
    pub method_name: String,
}

impl TestItem {
    pub fn new(path: &str, method: &TestMethod) -> Self {
        Self {
            path: path.to_string(),
            class_path: method.class_path.clone(),
            method_name: method.method_name.clone(),
        }
    }

    /// Selector accepted by JVM test runners, e.g. `--tests pkg.FooTest.testOne`.
    pub fn runtime_argument(&self) -> String {
        format!("{}.{}", self.class_path, self.method_name)
    }

    pub fn name(&self) -> String {
        format!("{}::{}", self.path, self.method_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_formats() {
        let item = TestItem::new(
            "java/a/TestOne.java",
            &TestMethod::new("tests.java.a.TestOne", "one"),
        );
        assert_eq!(item.runtime_argument(), "tests.java.a.TestOne.one");
        assert_eq!(item.name(), "java/a/TestOne.java::one");
    }
}
