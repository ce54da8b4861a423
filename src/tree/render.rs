use std::io::{self, Write};

use super::DependencyNode;

const BRANCH: &str = "|-- ";
const INDENT: &str = "|  ";
const ROOT_SEPARATOR: &str = "|";
const VULNERABLE_MARKER: &str = " Vulnerable";

/// Write every node of `forest`, one `|-- label` line each, indented by
/// depth. Roots are separated by a `|` line.
pub fn write_tree<W, F>(w: &mut W, forest: &[DependencyNode], label: F) -> io::Result<()>
where
    W: Write + ?Sized,
    F: Fn(&DependencyNode) -> String,
{
    for (i, root) in forest.iter().enumerate() {
        if i > 0 {
            writeln!(w, "{ROOT_SEPARATOR}")?;
        }
        write_subtree(w, root, &label)?;
    }
    Ok(())
}

/// Write only vulnerable nodes.
///
/// A vulnerable node without vulnerable children ends its path: it gets a
/// ` Vulnerable` marker and is not expanded further.
pub fn write_vulnerable_paths<W, F>(
    w: &mut W,
    forest: &[DependencyNode],
    label: F,
) -> io::Result<()>
where
    W: Write + ?Sized,
    F: Fn(&DependencyNode) -> String,
{
    let mut first = true;
    for root in forest.iter().filter(|root| root.vulnerable) {
        if !first {
            writeln!(w, "{ROOT_SEPARATOR}")?;
        }
        write_vulnerable_subtree(w, root, &label)?;
        first = false;
    }
    Ok(())
}

fn write_subtree<W, F>(w: &mut W, root: &DependencyNode, label: &F) -> io::Result<()>
where
    W: Write + ?Sized,
    F: Fn(&DependencyNode) -> String,
{
    let mut stack = vec![(root, 0)];
    while let Some((node, level)) = stack.pop() {
        writeln!(w, "{}{BRANCH}{}", INDENT.repeat(level), label(node))?;
        stack.extend(node.children.iter().rev().map(|child| (child, level + 1)));
    }
    Ok(())
}

fn write_vulnerable_subtree<W, F>(w: &mut W, root: &DependencyNode, label: &F) -> io::Result<()>
where
    W: Write + ?Sized,
    F: Fn(&DependencyNode) -> String,
{
    let mut stack = vec![(root, 0)];
    while let Some((node, level)) = stack.pop() {
        let expand = node.has_vulnerable_children();
        let marker = if expand { "" } else { VULNERABLE_MARKER };
        writeln!(w, "{}{BRANCH}{}{marker}", INDENT.repeat(level), label(node))?;

        if expand {
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .filter(|child| child.vulnerable)
                    .map(|child| (child, level + 1)),
            );
        }
    }
    Ok(())
}
