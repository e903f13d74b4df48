//! GTK4 binding: mounts a [`ChartOrchestrator`] into a `DrawingArea`.
//!
//! The adapter only translates widget signals into `init`, `dispose`,
//! pointer input and resize notifications.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib::SignalHandlerId;
use gtk4::prelude::*;
use tracing::warn;

use crate::api::ChartOrchestrator;
use crate::coordinators::{ContainerSize, ResizeCallback, ResizeObserver};
use crate::error::ChartResult;
use crate::render::{CairoContextRenderer, Renderer};

/// Resize observer backed by the `resize` signal of a drawing area.
#[derive(Debug)]
pub struct GtkResizeObserver {
    area: gtk::DrawingArea,
    handler: Option<SignalHandlerId>,
}

impl GtkResizeObserver {
    #[must_use]
    pub fn new(area: &gtk::DrawingArea) -> Self {
        Self {
            area: area.clone(),
            handler: None,
        }
    }
}

impl ResizeObserver for GtkResizeObserver {
    fn observe(&mut self, callback: ResizeCallback) -> ChartResult<()> {
        self.disconnect();
        let callback = RefCell::new(callback);
        let handler = self.area.connect_resize(move |area, width, height| {
            (callback.borrow_mut())(ContainerSize::new(f64::from(width), f64::from(height)));
            area.queue_draw();
        });
        self.handler = Some(handler);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(handler) = self.handler.take() {
            self.area.disconnect(handler);
        }
    }
}

pub struct GtkChartAdapter<R: Renderer> {
    orchestrator: Rc<RefCell<ChartOrchestrator<R>>>,
    area: gtk::DrawingArea,
    motion: Option<gtk::EventControllerMotion>,
}

impl<R> GtkChartAdapter<R>
where
    R: Renderer + CairoContextRenderer + 'static,
{
    #[must_use]
    pub fn new(orchestrator: ChartOrchestrator<R>) -> Self {
        let area = gtk::DrawingArea::new();
        let height = i32::try_from(orchestrator.config().height).unwrap_or(i32::MAX);
        area.set_content_height(height);
        area.set_hexpand(true);
        Self {
            orchestrator: Rc::new(RefCell::new(orchestrator)),
            area,
            motion: None,
        }
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    #[must_use]
    pub fn orchestrator(&self) -> Rc<RefCell<ChartOrchestrator<R>>> {
        Rc::clone(&self.orchestrator)
    }

    /// Mounts the engine; `initial_width` stands in until GTK reports a size.
    pub fn mount(&mut self, initial_width: f64) -> ChartResult<()> {
        let height = f64::from(self.area.content_height());
        self.orchestrator.borrow_mut().init(
            ContainerSize::new(initial_width, height),
            Box::new(GtkResizeObserver::new(&self.area)),
        )?;

        let weak = Rc::downgrade(&self.orchestrator);
        self.area.set_draw_func(move |_, context, _, _| {
            let Some(orchestrator) = weak.upgrade() else {
                return;
            };
            let Ok(mut orchestrator) = orchestrator.try_borrow_mut() else {
                return;
            };
            if let Err(err) = orchestrator.render_on_cairo_context(context) {
                warn!(error = %err, "chart draw failed");
            }
        });

        let motion = gtk::EventControllerMotion::new();
        let weak = Rc::downgrade(&self.orchestrator);
        let area = self.area.downgrade();
        motion.connect_motion(move |_, x, y| {
            if let Some(orchestrator) = weak.upgrade() {
                if let Err(err) = orchestrator.borrow_mut().pointer_move(x, y) {
                    warn!(error = %err, "pointer move dropped");
                }
            }
            if let Some(area) = area.upgrade() {
                area.queue_draw();
            }
        });
        let weak = Rc::downgrade(&self.orchestrator);
        let area = self.area.downgrade();
        motion.connect_leave(move |_| {
            if let Some(orchestrator) = weak.upgrade() {
                if let Err(err) = orchestrator.borrow_mut().pointer_leave() {
                    warn!(error = %err, "pointer leave dropped");
                }
            }
            if let Some(area) = area.upgrade() {
                area.queue_draw();
            }
        });
        self.area.add_controller(motion.clone());
        self.motion = Some(motion);
        self.area.queue_draw();
        Ok(())
    }

    /// Disposes the engine and detaches every widget hook.
    pub fn unmount(&mut self) {
        if let Some(motion) = self.motion.take() {
            self.area.remove_controller(&motion);
        }
        self.area.unset_draw_func();
        self.orchestrator.borrow_mut().dispose();
    }
}
