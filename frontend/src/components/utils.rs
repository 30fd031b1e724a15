use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// First image in the list; anything else is skipped with a warning.
pub fn first_image_file(file_list: &FileList) -> Option<GlooFile> {
    let mut chosen = None;
    for file in (0..file_list.length()).filter_map(|i| file_list.item(i)) {
        if !is_image_mime(&file.type_()) {
            log::warn!("Skipping non-image file: {}", file.name());
        } else if chosen.is_none() {
            chosen = Some(GlooFile::from(file));
        }
    }
    chosen
}
