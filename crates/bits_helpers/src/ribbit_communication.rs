use std::sync::LazyLock;

use bevy::prelude::*;
use parking_lot::Mutex;
use ribbit_bits::{BitDuration, BitMessage, BitParameters, BitResult, RibbitMessage};
use thiserror::Error;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

/// Failures on the bridge between a bit and the Ribbit page.
///
/// None of these are fatal: the message is dropped and the error logged.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("could not parse ribbit message: {0}")]
    Deserialize(String),

    #[error("could not serialize {0}")]
    Serialize(String),

    #[error("{0} not sent, no parent window")]
    NoParentWindow(String),

    #[error("could not post {message}: {reason}")]
    PostFailed { message: String, reason: String },
}

/// A FIFO shared between the host bridge and the Bevy world.
pub struct MessageQueue<M> {
    messages: Mutex<Vec<M>>,
}

impl<M> MessageQueue<M> {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, message: M) {
        self.messages.lock().push(message);
    }

    /// Takes every pending message, oldest first.
    pub fn drain(&self) -> Vec<M> {
        core::mem::take(&mut *self.messages.lock())
    }
}

impl<M> Default for MessageQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Messages sent by Ribbit, waiting to be handled by the bit.
pub static RIBBIT_MESSAGE_QUEUE: LazyLock<MessageQueue<RibbitMessage>> =
    LazyLock::new(MessageQueue::new);

/// Messages sent by the bit. Natively nobody reads them except the simulation.
#[cfg(not(target_arch = "wasm32"))]
pub static BIT_MESSAGE_QUEUE: LazyLock<MessageQueue<BitMessage>> =
    LazyLock::new(MessageQueue::new);

#[cfg(target_arch = "wasm32")]
pub fn listen_ribbit_messages() {
    let Some(window) = web_sys::window() else {
        error!("no global `window`, ribbit messages will not be received");
        return;
    };
    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        match serde_wasm_bindgen::from_value::<RibbitMessage>(event.data()) {
            Ok(message) => RIBBIT_MESSAGE_QUEUE.push(message),
            Err(err) => error!("{}", BridgeError::Deserialize(err.to_string())),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(err) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("failed to add message event listener: {err:?}");
        return;
    }

    // The listener lives for the whole program.
    closure.forget();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn send_bit_message(message: BitMessage) {
    BIT_MESSAGE_QUEUE.push(message);
}

#[cfg(target_arch = "wasm32")]
pub fn send_bit_message(message: BitMessage) {
    if let Err(err) = post_to_parent(&message) {
        error!("{err}");
    }
}

#[cfg(target_arch = "wasm32")]
fn post_to_parent(message: &BitMessage) -> Result<(), BridgeError> {
    let value = serde_wasm_bindgen::to_value(message)
        .map_err(|err| BridgeError::Serialize(format!("{message:?}: {err}")))?;

    let parent_window = web_sys::window()
        .and_then(|window| window.parent().ok().flatten())
        .ok_or_else(|| BridgeError::NoParentWindow(format!("{message:?}")))?;

    parent_window
        .post_message(&value, "*")
        .map_err(|err| BridgeError::PostFailed {
            message: format!("{message:?}"),
            reason: format!("{err:?}"),
        })
}

/// This trait implements the messages that can be called by Ribbit.
///
/// The functions need to be implemented for the platform to drive the bit.
/// They are not meant to be called directly from the bit itself.
pub trait RibbitMessageHandler: Send + Sync + Default + 'static {
    fn duration(world: &mut World) -> BitDuration;
    fn end(world: &mut World) -> BitResult;
    fn restart(world: &mut World);
}

fn process_ribbit_messages<T: RibbitMessageHandler>(world: &mut World) {
    for message in RIBBIT_MESSAGE_QUEUE.drain() {
        match message {
            RibbitMessage::End => {
                let result = T::end(world);
                send_bit_message(BitMessage::End(result));
            }
            RibbitMessage::Parameters => {
                let duration = T::duration(world);
                send_bit_message(BitMessage::Parameters(BitParameters { duration }));
            }
            RibbitMessage::Restart => T::restart(world),
            RibbitMessage::Start => {
                debug!("start received");
            }
        }
    }
}

fn ready() {
    send_bit_message(BitMessage::Ready);
}

#[derive(Default)]
pub struct RibbitCommunicationPlugin<T: RibbitMessageHandler>(core::marker::PhantomData<T>);

impl<T: RibbitMessageHandler> Plugin for RibbitCommunicationPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, process_ribbit_messages::<T>);
        #[cfg(target_arch = "wasm32")]
        {
            app.add_systems(Startup, listen_ribbit_messages);
        }
        app.add_systems(PostStartup, ready);
    }
}
