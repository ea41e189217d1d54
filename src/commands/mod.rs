pub mod info;
pub mod pack;
pub mod unpack;

use log::debug;

/// Progress callback that logs roughly every tenth of the blocks
pub fn log_progress(label: &'static str) -> impl FnMut(usize, usize) {
    move |done, total| {
        let step = (total / 10).max(1);
        if done % step == 0 || done == total {
            debug!("{label} [{done}/{total} blocks]");
        }
    }
}
