pub mod io {
    use either::Either;
    use std::fmt;
    use std::io::BufRead;
    use std::marker::PhantomData;
    use std::str::FromStr;

    /// Iterator over one parsed `T` per input line. Blank lines are skipped
    /// so trailing newlines and stray separators keep working.
    pub struct ParsedLines<R, T> {
        input: R,
        buffer: String,
        line: usize,
        _type_of_t: PhantomData<T>,
    }

    impl<R: BufRead, T: FromStr> ParsedLines<R, T> {
        pub fn new(input: R) -> Self {
            ParsedLines {
                input,
                buffer: String::new(),
                line: 0,
                _type_of_t: PhantomData,
            }
        }
    }

    impl<R, T> Iterator for ParsedLines<R, T>
    where
        R: BufRead,
        T: FromStr,
    {
        type Item = Result<T, LineError<T::Err>>;

        fn next(&mut self) -> Option<Self::Item> {
            loop {
                self.buffer.clear();
                let read = match self.input.read_line(&mut self.buffer) {
                    Ok(read) => read,
                    Err(e) => {
                        return Some(Err(LineError {
                            line: self.line + 1,
                            cause: Either::Right(e),
                        }));
                    }
                };

                if read == 0 {
                    return None;
                }

                self.line += 1;

                let trimmed = self.buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                return Some(match T::from_str(trimmed) {
                    Ok(t) => Ok(t),
                    Err(e) => Err(LineError {
                        line: self.line,
                        cause: Either::Left(e),
                    }),
                });
            }
        }
    }

    /// Parse or I/O failure tagged with the 1-based line it happened on.
    #[derive(Debug)]
    pub struct LineError<E> {
        pub line: usize,
        pub cause: Either<E, std::io::Error>,
    }

    impl<E: fmt::Display> fmt::Display for LineError<E> {
        fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(fmt, "line {}: {}", self.line, self.cause)
        }
    }

    impl<E: std::error::Error + 'static> std::error::Error for LineError<E> {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match &self.cause {
                Either::Left(e) => Some(e),
                Either::Right(e) => Some(e),
            }
        }
    }

}
