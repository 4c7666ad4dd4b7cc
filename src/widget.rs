//! The mounted captcha: a canvas, a reload trigger, and the generate-and-paint
//! cycle that runs on mount and on every reload.
//!
//! The challenge text is never stored. Each cycle generates it, paints it and
//! hands it to the host callback, then lets it go.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use log::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, MouseEvent, window};

use crate::canvas;
use crate::config::CaptchaConfig;
use crate::error::{CaptchaError, Result};
use crate::paint;
use crate::text::generate_text;

/// State shared between the JS handle and the click listener.
struct Core {
    ctx: CanvasRenderingContext2d,
    config: CaptchaConfig,
    on_code: Option<js_sys::Function>,
    rng: SmallRng,
}

impl Core {
    fn cycle(&mut self) -> Result<()> {
        let text = generate_text(&mut self.rng, &self.config);
        trace!("captcha text generated ({} chars)", text.len());
        let plan = paint::plan(&mut self.rng, &text, self.config.width, self.config.height);
        canvas::draw(&self.ctx, &plan)?;
        self.notify(&text);
        Ok(())
    }

    fn notify(&self, text: &str) {
        let Some(cb) = &self.on_code else { return };
        if let Err(err) = cb.call1(&JsValue::NULL, &JsValue::from_str(text)) {
            warn!("captcha callback threw: {err:?}");
        }
    }
}

fn run_cycle(core: &RefCell<Core>) -> Result<()> {
    // A callback that calls reload() lands here while the outer cycle still
    // holds the borrow.
    core.try_borrow_mut().map_err(|_| CaptchaError::Busy)?.cycle()
}

pub(crate) fn seeded_rng() -> Result<SmallRng> {
    let mut seed = [0u8; 8];
    getrandom::getrandom(&mut seed).map_err(|e| CaptchaError::Entropy(e.to_string()))?;
    Ok(SmallRng::seed_from_u64(u64::from_le_bytes(seed)))
}

/// Accepts an element id or an `Element`.
fn resolve_element(doc: &Document, target: &JsValue) -> Result<Element> {
    if let Some(id) = target.as_string() {
        return doc.get_element_by_id(&id).ok_or(CaptchaError::ElementNotFound(id));
    }
    target
        .clone()
        .dyn_into::<Element>()
        .map_err(|_| CaptchaError::Dom("expected an element or an element id".into()))
}

fn create_reload_button(doc: &Document) -> Result<Element> {
    let button = doc.create_element("button")?;
    button.set_attribute("type", "button")?;
    button.set_text_content(Some("Reload"));
    Ok(button)
}

fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

#[wasm_bindgen]
pub struct Captcha {
    core: Rc<RefCell<Core>>,
    canvas: HtmlCanvasElement,
    trigger: Element,
    owns_trigger: bool,
    on_click: Option<Closure<dyn FnMut(MouseEvent)>>,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl Captcha {
    /// `new Captcha(container, options?, onCode?, reloadTrigger?)`.
    ///
    /// `container` and `reloadTrigger` take an element or an element id. When
    /// no trigger is given a "Reload" button is placed after the canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: JsValue,
        options: JsValue,
        on_code: Option<js_sys::Function>,
        reload_trigger: JsValue,
    ) -> std::result::Result<Captcha, JsValue> {
        Ok(Self::mount(&container, &options, on_code, &reload_trigger)?)
    }

    /// Generate a fresh challenge and repaint the canvas from scratch.
    pub fn reload(&self) -> std::result::Result<(), JsValue> {
        debug!("captcha reload");
        run_cycle(&self.core).inspect_err(|err| warn!("captcha reload refused: {err}"))?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn canvas(&self) -> HtmlCanvasElement {
        self.canvas.clone()
    }

    /// Detach the listener and remove the elements this widget created. A
    /// host-supplied trigger stays in the page.
    pub fn unmount(&mut self) {
        self.detach();
        self.canvas.remove();
        if self.owns_trigger {
            self.trigger.remove();
        }
        debug!("captcha unmounted");
    }
}

impl Captcha {
    pub fn mount(
        container: &JsValue,
        options: &JsValue,
        on_code: Option<js_sys::Function>,
        reload_trigger: &JsValue,
    ) -> Result<Self> {
        let config = CaptchaConfig::from_js(options)?;
        let win = window().ok_or(CaptchaError::NoWindow)?;
        let doc = win.document().ok_or(CaptchaError::NoDocument)?;

        // Resolve everything before touching the page.
        let host = resolve_element(&doc, container)?;
        let custom_trigger = if is_absent(reload_trigger) {
            None
        } else {
            Some(resolve_element(&doc, reload_trigger)?)
        };
        let canvas = canvas::create_canvas(&doc, config.width, config.height)?;
        let ctx = canvas::context_2d(&canvas)?;
        let rng = seeded_rng()?;

        host.append_child(&canvas)?;
        let (trigger, owns_trigger) = match custom_trigger {
            Some(el) => (el, false),
            None => {
                let button = create_reload_button(&doc)?;
                host.append_child(&button)?;
                (button, true)
            }
        };

        let (width, height) = (config.width, config.height);
        let core = Rc::new(RefCell::new(Core { ctx, config, on_code, rng }));

        let weak = Rc::downgrade(&core);
        let on_click = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            let Some(core) = weak.upgrade() else { return };
            debug!("captcha reload (trigger)");
            if let Err(err) = run_cycle(&core) {
                warn!("captcha reload failed: {err}");
            }
        }) as Box<dyn FnMut(_)>);
        trigger.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        let mut captcha = Captcha {
            core,
            canvas,
            trigger,
            owns_trigger,
            on_click: Some(on_click),
            width,
            height,
        };
        if let Err(err) = run_cycle(&captcha.core) {
            captcha.unmount();
            return Err(err);
        }
        debug!("captcha mounted ({width}x{height}, custom trigger: {})", !owns_trigger);
        Ok(captcha)
    }

    fn detach(&mut self) {
        let Some(on_click) = self.on_click.take() else { return };
        if let Err(err) = self
            .trigger
            .remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        {
            warn!("failed to detach captcha reload listener: {err:?}");
        }
    }
}

impl Drop for Captcha {
    fn drop(&mut self) {
        self.detach();
    }
}
