/// USART1, shared by the log output and the vision link.
///
/// Outgoing traffic is log lines for a terminal mixed with `!command` lines
/// for the vision host. Incoming traffic is single-byte hand frames. Both
/// directions are buffered and moved by the USART1 interrupt.
pub mod uart1 {
    use crate::interrupt;
    use crate::hal::{
        pac,
        prelude::*,
        serial::{Event, Serial},
    };
    use heapless::spsc::{Consumer, Producer, Queue};
    use stm32f0xx_hal::gpio::{gpiob, Alternate, AF0};

    // Several log lines; frames come in at camera rate and are drained every loop.
    const OUT_SIZE: usize = 256;
    const IN_SIZE: usize = 16;

    pub type TxPin = gpiob::PB6<Alternate<AF0>>;
    pub type RxPin = gpiob::PB7<Alternate<AF0>>;
    type Port = Serial<pac::USART1, TxPin, RxPin>;

    /// Half used by the main loop
    struct LoopEnd {
        outgoing: Producer<'static, u8, OUT_SIZE>,
        incoming: Consumer<'static, u8, IN_SIZE>,
    }

    /// Half used by the interrupt, which also owns the port
    struct IrqEnd {
        port: Port,
        outgoing: Consumer<'static, u8, OUT_SIZE>,
        incoming: Producer<'static, u8, IN_SIZE>,
    }

    static mut LOOP_END: Option<LoopEnd> = None;
    static mut IRQ_END: Option<IrqEnd> = None;

    /// Must be called once, before anything is sent or the logger is installed
    pub fn init(mut port: Port, irq_prio: u8) {
        static mut OUT: Queue<u8, OUT_SIZE> = Queue::new();
        static mut IN: Queue<u8, IN_SIZE> = Queue::new();

        port.listen(Event::Rxne);

        let (out_producer, out_consumer) = unsafe { OUT.split() };
        let (in_producer, in_consumer) = unsafe { IN.split() };

        let mut nvic = unsafe { pac::CorePeripherals::steal() }.NVIC;
        unsafe {
            LOOP_END = Some(LoopEnd {
                outgoing: out_producer,
                incoming: in_consumer,
            });
            IRQ_END = Some(IrqEnd {
                port,
                outgoing: out_consumer,
                incoming: in_producer,
            });

            nvic.set_priority(pac::Interrupt::USART1, irq_prio);
            pac::NVIC::unmask(pac::Interrupt::USART1);
        }
    }

    fn loop_end() -> Option<&'static mut LoopEnd> {
        unsafe { LOOP_END.as_mut() }
    }

    /// Unmask TXE so the interrupt starts draining the outgoing queue.
    fn start_tx() {
        cortex_m::interrupt::free(|_| {
            let usart1 = unsafe { &*pac::USART1::ptr() };
            usart1.cr1.modify(|_, w| w.txeie().set_bit());
        });
    }

    /// Next hand frame byte from the vision host, if any.
    pub fn read_byte() -> Option<u8> {
        loop_end()?.incoming.dequeue()
    }

    /// Queue a link command as a unit. Nothing is queued, and false is
    /// returned, when there is no room for all of it.
    pub fn send(line: &str) -> bool {
        let end = match loop_end() {
            Some(end) => end,
            None => return false,
        };
        let bytes = line.as_bytes();
        if end.outgoing.capacity() - end.outgoing.len() < bytes.len() {
            return false;
        }
        for &b in bytes {
            end.outgoing.enqueue(b).ok();
        }
        start_tx();
        true
    }

    /// Sink for log output. Whatever does not fit in the queue is lost.
    pub struct LogWriter;

    impl core::fmt::Write for LogWriter {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            if let Some(end) = loop_end() {
                for b in s.bytes() {
                    if end.outgoing.enqueue(b).is_err() {
                        break;
                    }
                }
                start_tx();
            }
            Ok(())
        }
    }

    impl IrqEnd {
        fn receive(&mut self) {
            // With the loop stalled the queue fills and the newest frames are
            // lost; the ones already queued still get debounced.
            if let Ok(byte) = self.port.read() {
                self.incoming.enqueue(byte).ok();
            }
        }

        fn transmit(&mut self) {
            match self.outgoing.peek() {
                Some(&byte) => {
                    // WouldBlock until the data register is empty again
                    if self.port.write(byte).is_ok() {
                        self.outgoing.dequeue();
                    }
                }
                None => self.port.unlisten(Event::Txe),
            }
        }
    }

    #[interrupt]
    fn USART1() {
        if let Some(end) = unsafe { IRQ_END.as_mut() } {
            end.receive();
            end.transmit();
        }
    }
}
