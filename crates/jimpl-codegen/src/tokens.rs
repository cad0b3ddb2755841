//! Source fragments shared by the rendering functions.

pub const IMPL_SUFFIX: &str = "Impl";
pub const SOURCE_EXTENSION: &str = "java";
pub const CLASS_EXTENSION: &str = "class";

pub const PACKAGE: &str = "package";
pub const PUBLIC: &str = "public";
pub const CLASS: &str = "class";
pub const EXTENDS: &str = "extends";
pub const IMPLEMENTS: &str = "implements";
pub const THROWS: &str = "throws";
pub const SUPER: &str = "super";
pub const RETURN: &str = "return";

pub const FALSE_LITERAL: &str = "false";
pub const ZERO_LITERAL: &str = "0";
pub const NULL_LITERAL: &str = "null";

pub const LINE: &str = "\n";
pub const INDENT: &str = "    ";

/// Join `items` through `render`, comma-and-space separated.
pub fn join_mapped<T>(items: &[T], render: impl FnMut(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(", ")
}
