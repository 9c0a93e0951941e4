//! Commands that change bindings: `-D`, `-A`, `-N` and `-C`.

use zle_core::{Status, WidgetFlags, ZleError, ZleResult};

use crate::registry::CANONICAL_PREFIX;
use crate::widget::{Widget, WidgetId, WidgetKind};
use crate::Zle;

impl Zle {
    /// Unbind `name`. Protected names are refused.
    pub fn delete(&mut self, name: &str) -> ZleResult<()> {
        let thingy = self
            .registry
            .thingies()
            .lookup(name)
            .filter(|&t| self.registry.thingies().is_enabled(t))
            .ok_or_else(|| ZleError::UnknownName(name.to_string()))?;
        self.registry.unbind_widget(thingy, false)
    }

    /// Delete every name, reporting each failure and carrying on.
    pub(crate) fn delete_command(&mut self, cmd: &str, names: &[String]) -> Status {
        let mut status = Status::Success;
        for name in names {
            if let Err(e) = self.delete(name) {
                self.warn(cmd, &e);
                status = Status::Failure;
            }
        }
        status
    }

    /// Make `dest` another name for the widget `source` names.
    pub fn link(&mut self, source: &str, dest: &str) -> ZleResult<()> {
        let widget = self
            .registry
            .widget_named(source)
            .ok_or_else(|| ZleError::UnknownName(source.to_string()))?;
        let thingy = self.registry.thingies_mut().resolve(dest);
        self.registry.bind_widget(widget, thingy)
    }

    /// Define `name` as a widget running the shell function `function`,
    /// or the function of the same name.
    pub fn define(&mut self, name: &str, function: Option<&str>) -> ZleResult<()> {
        let widget = Widget::user(function.unwrap_or(name));
        self.bind_new(name, widget).map(|_| ())
    }

    /// Define `name` as a completion widget that behaves like the
    /// completion widget `widget` and is driven by the shell function
    /// `driver`.
    pub fn wrap_completion(&mut self, name: &str, widget: &str, driver: &str) -> ZleResult<()> {
        if !self.completion.require() {
            return Err(ZleError::CapabilityUnavailable);
        }

        let canonical = if widget.starts_with(CANONICAL_PREFIX) {
            widget.to_string()
        } else {
            format!("{CANONICAL_PREFIX}{widget}")
        };
        let func = self
            .registry
            .widget_named(&canonical)
            .and_then(|id| self.registry.widgets().get(id))
            .filter(|w| w.is_completion())
            .and_then(|w| match w.kind {
                WidgetKind::Native(func) => Some(func),
                WidgetKind::Completion { func, .. } => Some(func),
                WidgetKind::User { .. } => None,
            })
            .ok_or_else(|| ZleError::InvalidWidget(widget.to_string()))?;

        let wrapper = Widget::new(
            WidgetKind::Completion {
                func,
                widget: widget.to_string(),
                driver: driver.to_string(),
            },
            WidgetFlags::MENU_COMPLETE | WidgetFlags::KEEP_SUFFIX,
        );
        self.bind_new(name, wrapper)?;
        self.completion_widgets += 1;
        Ok(())
    }

    /// Bind a fresh widget to `name`, dropping it again if the name is
    /// protected.
    fn bind_new(&mut self, name: &str, widget: Widget) -> ZleResult<WidgetId> {
        let id = self.registry.create_widget(widget);
        let thingy = self.registry.thingies_mut().resolve(name);
        match self.registry.bind_widget(id, thingy) {
            Ok(()) => Ok(id),
            Err(e) => {
                self.registry.discard_widget(id);
                Err(e)
            }
        }
    }
}
