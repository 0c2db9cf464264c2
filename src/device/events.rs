//! Device lifetime notifications.

/// The events fired while the native device is lost and recreated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeviceEvent {
    /// The native context has gone away. Every native object is invalid.
    Lost,
    /// Fired at the beginning of `reset`, before any content is reloaded.
    Resetting,
    /// Fired once `reset` completes.
    Reset,
}

/// A handle to a registered `DeviceListener`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceListenerHandle(u32);

pub trait DeviceListener {
    fn on_device_lost(&mut self) -> Result<(), failure::Error> {
        Ok(())
    }

    fn on_device_resetting(&mut self) -> Result<(), failure::Error> {
        Ok(())
    }

    fn on_device_reset(&mut self) -> Result<(), failure::Error> {
        Ok(())
    }
}

impl<F> DeviceListener for F
where
    F: FnMut(DeviceEvent) -> Result<(), failure::Error>,
{
    fn on_device_lost(&mut self) -> Result<(), failure::Error> {
        self(DeviceEvent::Lost)
    }

    fn on_device_resetting(&mut self) -> Result<(), failure::Error> {
        self(DeviceEvent::Resetting)
    }

    fn on_device_reset(&mut self) -> Result<(), failure::Error> {
        self(DeviceEvent::Reset)
    }
}

/// Reloads every piece of content whose native objects went away together
/// with the device. Implemented by the content manager.
pub trait ContentReloader {
    fn reload_all_content(&mut self) -> Result<(), failure::Error>;
}

/// Listeners are notified synchronously, in the order they were added.
#[derive(Default)]
pub(crate) struct DeviceListeners {
    next: u32,
    listeners: Vec<(DeviceListenerHandle, Box<dyn DeviceListener>)>,
}

impl DeviceListeners {
    pub fn add<T>(&mut self, listener: T) -> DeviceListenerHandle
    where
        T: DeviceListener + 'static,
    {
        let handle = DeviceListenerHandle(self.next);
        self.next += 1;
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    pub fn remove(&mut self, handle: DeviceListenerHandle) -> bool {
        let len = self.listeners.len();
        self.listeners.retain(|v| v.0 != handle);
        len != self.listeners.len()
    }

    pub fn notify(&mut self, event: DeviceEvent) -> Result<(), failure::Error> {
        for (_, v) in &mut self.listeners {
            match event {
                DeviceEvent::Lost => v.on_device_lost()?,
                DeviceEvent::Resetting => v.on_device_resetting()?,
                DeviceEvent::Reset => v.on_device_reset()?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Counter(Rc<RefCell<Vec<(usize, DeviceEvent)>>>, usize);

    impl DeviceListener for Counter {
        fn on_device_reset(&mut self) -> Result<(), failure::Error> {
            self.0.borrow_mut().push((self.1, DeviceEvent::Reset));
            Ok(())
        }
    }

    #[test]
    fn ordered() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = DeviceListeners::default();
        let a = listeners.add(Counter(log.clone(), 0));
        listeners.add(Counter(log.clone(), 1));

        listeners.notify(DeviceEvent::Lost).unwrap();
        assert!(log.borrow().is_empty());

        listeners.notify(DeviceEvent::Reset).unwrap();
        assert_eq!(
            *log.borrow(),
            [(0, DeviceEvent::Reset), (1, DeviceEvent::Reset)]
        );

        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));

        listeners.notify(DeviceEvent::Reset).unwrap();
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(log.borrow()[2], (1, DeviceEvent::Reset));
    }

    #[test]
    fn closure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = DeviceListeners::default();

        let cloned = log.clone();
        listeners.add(move |e: DeviceEvent| -> Result<(), failure::Error> {
            cloned.borrow_mut().push(e);
            Ok(())
        });

        listeners.notify(DeviceEvent::Resetting).unwrap();
        listeners.notify(DeviceEvent::Reset).unwrap();
        assert_eq!(*log.borrow(), [DeviceEvent::Resetting, DeviceEvent::Reset]);
    }

    #[test]
    fn failure() {
        let mut listeners = DeviceListeners::default();
        listeners.add(|_: DeviceEvent| -> Result<(), failure::Error> {
            Err(failure::err_msg("boom"))
        });
        assert!(listeners.notify(DeviceEvent::Lost).is_err());
    }
}
