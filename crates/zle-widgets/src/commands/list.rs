//! `zle -l`: list widgets or test whether they exist.

use zle_core::Status;

use crate::options::Options;
use crate::quote::{nice, quote};
use crate::thingy::{ThingyId, Visibility};
use crate::widget::WidgetKind;
use crate::Zle;

/// How `zle -l` prints widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Every widget name, native ones included (`-a`).
    Names,
    /// `zle -N`/`zle -C` commands recreating the user widgets (`-L`).
    Commands,
    /// User widgets with their functions, for reading (default).
    Readable,
}

impl ListFormat {
    pub fn from_options(ops: &Options) -> Self {
        if ops.is_set('a') {
            ListFormat::Names
        } else if ops.is_set('L') {
            ListFormat::Commands
        } else {
            ListFormat::Readable
        }
    }
}

impl Zle {
    /// Listing lines for every widget name, sorted by name.
    pub fn list_widgets(&self, format: ListFormat) -> Vec<String> {
        let thingies = self.registry.thingies();
        let mut ids = thingies.ids(Visibility::Enabled);
        ids.sort_by(|&a, &b| thingies.name(a).cmp(thingies.name(b)));
        ids.into_iter()
            .filter_map(|t| self.describe(t, format))
            .collect()
    }

    /// Whether every name is a widget. Native widgets only count when
    /// `include_native` is set.
    pub fn widgets_exist(&self, names: &[String], include_native: bool) -> bool {
        names.iter().all(|name| {
            self.registry
                .thingies()
                .lookup(name)
                .and_then(|t| self.registry.widget_of(t))
                .is_some_and(|w| include_native || !w.kind.is_native())
        })
    }

    pub(crate) fn list_command(&mut self, names: &[String], ops: &Options) -> Status {
        if !names.is_empty() {
            return Status::from(self.widgets_exist(names, ops.is_set('a')));
        }
        for line in self.list_widgets(ListFormat::from_options(ops)) {
            self.print(&line);
        }
        Status::Success
    }

    fn describe(&self, thingy: ThingyId, format: ListFormat) -> Option<String> {
        let name = self.registry.thingies().name(thingy);
        if format == ListFormat::Names {
            return Some(name.to_string());
        }
        let widget = self.registry.widget_of(thingy)?;

        match (&widget.kind, format) {
            (WidgetKind::Native(_), _) => None,
            (WidgetKind::User { function }, ListFormat::Commands) => {
                let mut line = format!("zle -N {}{}", dash_guard(name), quote(name));
                if function != name {
                    line.push(' ');
                    line.push_str(&quote(function));
                }
                Some(line)
            }
            (WidgetKind::Completion { widget, driver, .. }, ListFormat::Commands) => Some(format!(
                "zle -C {}{} {} {}",
                dash_guard(name),
                quote(name),
                quote(widget),
                quote(driver)
            )),
            (WidgetKind::User { function }, _) => {
                if function == name {
                    Some(nice(name))
                } else {
                    Some(format!("{} ({})", nice(name), nice(function)))
                }
            }
            (WidgetKind::Completion { widget, driver, .. }, _) => Some(format!(
                "{} -C {} {}",
                nice(name),
                nice(widget),
                nice(driver)
            )),
        }
    }
}

/// Names starting with `-` need `--` in front to be read back as names.
fn dash_guard(name: &str) -> &'static str {
    if name.starts_with('-') {
        "-- "
    } else {
        ""
    }
}
