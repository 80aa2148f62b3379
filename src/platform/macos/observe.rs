//! macOS notification observing on the Core Foundation run loop.

use super::{display, power};
use crate::error::{Error, Result};
use crate::event::{AppData, Event};
use crate::observer::EventHandler;
use objc2::rc::Retained;
use objc2::runtime::{AnyObject, NSObject, NSObjectProtocol, Sel};
use objc2::{AnyThread, class, define_class, msg_send, sel};
use objc2_core_foundation::{CFRunLoop, CFRunLoopRunResult, kCFRunLoopDefaultMode};
use objc2_foundation::{NSAutoreleasePool, NSNotification, NSString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Stored handler for every subscription.
static HANDLER: Mutex<Option<Box<dyn EventHandler>>> = Mutex::new(None);

/// How long one run loop pass may wait before the stop flag is checked.
const RUN_LOOP_SLICE_SECS: f64 = 0.5;

const DID_LAUNCH_APPLICATION: &str = "NSWorkspaceDidLaunchApplicationNotification";
const DID_TERMINATE_APPLICATION: &str = "NSWorkspaceDidTerminateApplicationNotification";
const DID_WAKE: &str = "NSWorkspaceDidWakeNotification";
const INPUT_SOURCE_CHANGED: &str = "com.apple.Carbon.TISNotifySelectedKeyboardInputSourceChanged";
const APPLICATION_KEY: &str = "NSWorkspaceApplicationKey";

#[link(name = "Cocoa", kind = "framework")]
unsafe extern "C" {}

define_class!(
    // SAFETY:
    // - NSObject has no subclassing requirements.
    // - NotificationObserver does not implement Drop.
    #[unsafe(super(NSObject))]
    #[name = "SketchyRelayNotificationObserver"]
    struct NotificationObserver;

    unsafe impl NSObjectProtocol for NotificationObserver {}

    impl NotificationObserver {
        #[unsafe(method(applicationLaunched:))]
        fn application_launched(&self, notification: &NSNotification) {
            dispatch(&Event::application_launched(app_data(notification)));
        }

        #[unsafe(method(applicationTerminated:))]
        fn application_terminated(&self, notification: &NSNotification) {
            dispatch(&Event::application_terminated(app_data(notification)));
        }

        #[unsafe(method(systemWoke:))]
        fn system_woke(&self, _notification: &NSNotification) {
            dispatch(&Event::system_woke());
        }

        #[unsafe(method(inputSourceChanged:))]
        fn input_source_changed(&self, _notification: &NSNotification) {
            dispatch(&Event::input_source_changed());
        }
    }
);

impl NotificationObserver {
    fn new() -> Retained<Self> {
        let this = Self::alloc().set_ivars(());
        unsafe { msg_send![super(this), init] }
    }
}

/// Hand an event to the registered handler.
pub(super) fn dispatch(event: &Event) {
    if let Ok(guard) = HANDLER.lock()
        && let Some(ref handler) = *guard
    {
        handler.handle_event(event);
    }
}

/// Pull the running application out of a workspace notification.
fn app_data(notification: &NSNotification) -> Option<AppData> {
    let key = NSString::from_str(APPLICATION_KEY);
    unsafe {
        let user_info: Option<Retained<AnyObject>> = msg_send![notification, userInfo];
        let user_info = user_info?;
        let app: Option<Retained<AnyObject>> = msg_send![&*user_info, objectForKey: &*key];
        let app = app?;

        let pid: i32 = msg_send![&*app, processIdentifier];
        let bundle_id: Option<Retained<NSString>> = msg_send![&*app, bundleIdentifier];
        let name: Option<Retained<NSString>> = msg_send![&*app, localizedName];

        Some(AppData {
            pid,
            bundle_id: bundle_id.map(|s| s.to_string()),
            name: name.map(|s| s.to_string()),
        })
    }
}

fn workspace_center() -> Result<Retained<AnyObject>> {
    unsafe {
        let workspace: Option<Retained<AnyObject>> =
            msg_send![class!(NSWorkspace), sharedWorkspace];
        let workspace = workspace
            .ok_or_else(|| Error::ObserverStartFailed("failed to get shared workspace".into()))?;
        let center: Option<Retained<AnyObject>> = msg_send![&*workspace, notificationCenter];
        center.ok_or_else(|| {
            Error::ObserverStartFailed("failed to get workspace notification center".into())
        })
    }
}

fn distributed_center() -> Result<Retained<AnyObject>> {
    unsafe {
        let center: Option<Retained<AnyObject>> =
            msg_send![class!(NSDistributedNotificationCenter), defaultCenter];
        center.ok_or_else(|| {
            Error::ObserverStartFailed("failed to get distributed notification center".into())
        })
    }
}

/// # Safety
///
/// `center` must be an `NSNotificationCenter` and `observer` must respond to
/// `selector`.
unsafe fn add_observer(
    center: &AnyObject,
    observer: &NotificationObserver,
    selector: Sel,
    name: &str,
) {
    let name = NSString::from_str(name);
    let _: () = unsafe {
        msg_send![
            center,
            addObserver: observer,
            selector: selector,
            name: &*name,
            object: Option::<&AnyObject>::None
        ]
    };
}

/// # Safety
///
/// `center` must be an `NSNotificationCenter`.
unsafe fn remove_observer(center: &AnyObject, observer: &NotificationObserver) {
    let _: () = unsafe { msg_send![center, removeObserver: observer] };
}

/// Register every subscription and run the loop until `running` is cleared.
pub fn run_observer<H: EventHandler + 'static>(
    running: &Arc<AtomicBool>,
    handler: H,
) -> Result<()> {
    {
        let mut h = HANDLER
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *h = Some(Box::new(handler));
    }

    let result = observe_until_stopped(running);

    {
        let mut h = HANDLER
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *h = None;
    }

    result
}

fn observe_until_stopped(running: &Arc<AtomicBool>) -> Result<()> {
    let _pool = unsafe { NSAutoreleasePool::new() };

    let current_loop = CFRunLoop::current()
        .ok_or_else(|| Error::ObserverStartFailed("failed to get current run loop".into()))?;
    let workspace = workspace_center()?;
    let distributed = distributed_center()?;
    let observer = NotificationObserver::new();

    unsafe {
        add_observer(
            &workspace,
            &observer,
            sel!(applicationLaunched:),
            DID_LAUNCH_APPLICATION,
        );
        add_observer(
            &workspace,
            &observer,
            sel!(applicationTerminated:),
            DID_TERMINATE_APPLICATION,
        );
        add_observer(&workspace, &observer, sel!(systemWoke:), DID_WAKE);
        add_observer(
            &distributed,
            &observer,
            sel!(inputSourceChanged:),
            INPUT_SOURCE_CHANGED,
        );
    }

    let display_registered = display::register();
    if !display_registered {
        log::warn!("display reconfiguration callback could not be registered");
    }

    let power_watch = power::PowerSourceWatch::install(&current_loop);
    if power_watch.is_none() {
        log::warn!("power source notifications are unavailable");
    }

    log::debug!("observing workspace, input source, display and power notifications");
    dispatch(&Event::observer_enabled());

    while running.load(Ordering::SeqCst) {
        let result = unsafe {
            CFRunLoop::run_in_mode(kCFRunLoopDefaultMode, RUN_LOOP_SLICE_SECS, false)
        };
        // No sources attached: nothing would wake the loop, so pace the stop check.
        if result == CFRunLoopRunResult::Finished {
            std::thread::sleep(Duration::from_secs_f64(RUN_LOOP_SLICE_SECS));
        }
    }

    dispatch(&Event::observer_disabled());

    if let Some(watch) = power_watch {
        watch.uninstall(&current_loop);
    }
    if display_registered {
        display::unregister();
    }
    unsafe {
        remove_observer(&distributed, &observer);
        remove_observer(&workspace, &observer);
    }

    Ok(())
}

/// Wake the main run loop so a cleared stop flag is noticed promptly.
pub fn stop_observer() -> Result<()> {
    if let Some(run_loop) = CFRunLoop::main() {
        run_loop.stop();
    }
    Ok(())
}
